//! Process-local document store for development and tests

use crate::domain::repository::{matches_all, Document, DocumentStore, FieldFilter};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Documents kept in insertion order per collection
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(String, Document)>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, doc: Document) -> Result<String> {
        let id = new_id();
        self.collections
            .write()
            .entry(collection.to_owned())
            .or_default()
            .push((id.clone(), doc));
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Ok(self.collections.read().get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(_, doc)| doc.clone())
        }))
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let mut collections = self.collections.write();
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
        else {
            return Ok(false);
        };
        doc.1.extend(patch);
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.write();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|(doc_id, _)| doc_id != id);
        Ok(docs.len() != before)
    }

    async fn list(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<(String, Document)>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| matches_all(filters, doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn batch_create(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<String>> {
        let entries: Vec<(String, Document)> = docs.into_iter().map(|doc| (new_id(), doc)).collect();
        let ids = entries.iter().map(|(id, _)| id.clone()).collect();
        // Single write guard: readers never observe a partial batch
        self.collections
            .write()
            .entry(collection.to_owned())
            .or_default()
            .extend(entries);
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::to_document;
    use serde_json::json;

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create("ships", to_document(&json!({"name": "Aurora", "status": "active"})).unwrap())
            .await
            .unwrap();

        let patch = to_document(&json!({"status": "maintenance"})).unwrap();
        assert!(store.update("ships", &id, patch).await.unwrap());

        let doc = store.get("ships", &id).await.unwrap().unwrap();
        assert_eq!(doc["name"], "Aurora");
        assert_eq!(doc["status"], "maintenance");
    }

    #[tokio::test]
    async fn missing_documents_report_absence() {
        let store = InMemoryDocumentStore::new();
        assert!(store.get("ships", "nope").await.unwrap().is_none());
        assert!(!store.update("ships", "nope", Document::new()).await.unwrap());
        assert!(!store.delete("ships", "nope").await.unwrap());
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_and_filters() {
        let store = InMemoryDocumentStore::new();
        let docs = ["a", "b", "c"]
            .iter()
            .map(|name| to_document(&json!({"name": name, "ship_id": "s1"})).unwrap())
            .collect();
        let ids = store.batch_create("users", docs).await.unwrap();
        store
            .create("users", to_document(&json!({"name": "d", "ship_id": "s2"})).unwrap())
            .await
            .unwrap();

        let on_s1 = store
            .list("users", &[FieldFilter::eq("ship_id", "s1")])
            .await
            .unwrap();
        let listed: Vec<_> = on_s1.into_iter().map(|(id, _)| id).collect();
        assert_eq!(listed, ids);
        assert_eq!(store.len("users"), 4);
    }
}
