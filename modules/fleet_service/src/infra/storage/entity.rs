//! SeaORM entity for the shared documents table

use sea_orm::entity::prelude::*;

/// One schemaless document; every collection shares this table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Collection name (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection: String,

    /// Generated document id (part of composite primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Document body as a JSON object
    pub data: Json,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
