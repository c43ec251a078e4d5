//! SeaORM-backed document store over the `documents` table

use super::entity;
use crate::domain::repository::{matches_all, Document, DocumentStore, FieldFilter};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

pub struct SeaOrmDocumentStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDocumentStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn new_row(collection: &str, doc: Document) -> (String, entity::ActiveModel) {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let row = entity::ActiveModel {
        collection: Set(collection.to_owned()),
        id: Set(id.clone()),
        data: Set(Value::Object(doc)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    (id, row)
}

fn body(model: entity::Model) -> Result<Document> {
    match model.data {
        Value::Object(doc) => Ok(doc),
        other => bail!(
            "document {}/{} is not a JSON object: {other}",
            model.collection,
            model.id
        ),
    }
}

#[async_trait]
impl DocumentStore for SeaOrmDocumentStore {
    async fn create(&self, collection: &str, doc: Document) -> Result<String> {
        let (id, row) = new_row(collection, doc);
        entity::Entity::insert(row).exec_without_returning(&*self.db).await?;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        entity::Entity::find_by_id((collection.to_owned(), id.to_owned()))
            .one(&*self.db)
            .await?
            .map(body)
            .transpose()
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let txn = self.db.begin().await?;
        let Some(model) = entity::Entity::find_by_id((collection.to_owned(), id.to_owned()))
            .one(&txn)
            .await?
        else {
            return Ok(false);
        };

        let mut doc = body(model.clone())?;
        doc.extend(patch);
        let mut active: entity::ActiveModel = model.into();
        active.data = Set(Value::Object(doc));
        active.updated_at = Set(Utc::now());
        active.update(&txn).await?;
        txn.commit().await?;
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let result = entity::Entity::delete_by_id((collection.to_owned(), id.to_owned()))
            .exec(&*self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<(String, Document)>> {
        let rows = entity::Entity::find()
            .filter(entity::Column::Collection.eq(collection))
            .order_by_asc(entity::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        // JSON field filters run here so the query stays portable across backends
        let mut out = Vec::new();
        for row in rows {
            let id = row.id.clone();
            let doc = body(row)?;
            if matches_all(filters, &doc) {
                out.push((id, doc));
            }
        }
        Ok(out)
    }

    async fn batch_create(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<String>> {
        let txn = self.db.begin().await?;
        let mut ids = Vec::with_capacity(docs.len());
        for doc in docs {
            let (id, row) = new_row(collection, doc);
            entity::Entity::insert(row).exec_without_returning(&txn).await?;
            ids.push(id);
        }
        txn.commit().await?;
        Ok(ids)
    }
}
