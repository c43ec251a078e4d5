//! Database migrations for the fleet service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_documents::Migration)]
    }
}

mod m20250101_000001_create_documents {
    use super::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Documents::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Documents::Collection).string().not_null())
                        .col(ColumnDef::new(Documents::Id).string().not_null())
                        .col(ColumnDef::new(Documents::Data).json().not_null())
                        .col(
                            ColumnDef::new(Documents::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .col(
                            ColumnDef::new(Documents::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .primary_key(
                            Index::create()
                                .col(Documents::Collection)
                                .col(Documents::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_documents_collection")
                        .table(Documents::Table)
                        .col(Documents::Collection)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Documents::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Documents {
        Table,
        Collection,
        Id,
        Data,
        CreatedAt,
        UpdatedAt,
    }
}
