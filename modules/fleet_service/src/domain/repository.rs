//! Document store port and the typed collection adapter on top of it

use super::scope::ShipScope;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Raw schemaless document body (top-level fields only, no id)
pub type Document = Map<String, Value>;

/// Equality condition on a single top-level field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Serialize) -> Self {
        Self {
            field: field.into(),
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field).unwrap_or(&Value::Null) == &self.value
    }
}

/// Returns true when every filter matches `doc`
pub fn matches_all(filters: &[FieldFilter], doc: &Document) -> bool {
    filters.iter().all(|f| f.matches(doc))
}

/// Schemaless document database, addressed per collection
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `doc` under a freshly generated id and return that id
    async fn create(&self, collection: &str, doc: Document) -> Result<String>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Merge top-level fields of `patch` into the document; false if absent
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool>;

    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// All documents whose fields equal every filter
    async fn list(&self, collection: &str, filters: &[FieldFilter])
        -> Result<Vec<(String, Document)>>;

    /// Create all documents or none of them
    async fn batch_create(&self, collection: &str, docs: Vec<Document>) -> Result<Vec<String>>;
}

/// A typed entity persisted in one collection
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    /// Denormalized fields computed at read time and never persisted
    const DERIVED: &'static [&'static str] = &[];
}

/// Typed view over one collection; the only place models become documents
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn encode(record: &T) -> Result<Document> {
        let mut doc = to_document(record)?;
        doc.remove("id");
        for field in T::DERIVED {
            doc.remove(*field);
        }
        Ok(doc)
    }

    fn decode(id: String, mut doc: Document) -> Result<T> {
        doc.insert("id".to_owned(), Value::String(id));
        Ok(serde_json::from_value(Value::Object(doc))?)
    }

    /// Persist a new record; the `id` it carries is replaced by the store's
    pub async fn insert(&self, record: &T) -> Result<T> {
        let doc = Self::encode(record)?;
        let id = self.store.create(T::COLLECTION, doc.clone()).await?;
        Self::decode(id, doc)
    }

    /// Persist all records atomically
    pub async fn insert_batch(&self, records: &[T]) -> Result<Vec<T>> {
        let docs = records
            .iter()
            .map(Self::encode)
            .collect::<Result<Vec<_>>>()?;
        let ids = self.store.batch_create(T::COLLECTION, docs.clone()).await?;
        if ids.len() != docs.len() {
            bail!(
                "batch write to '{}' returned {} ids for {} documents",
                T::COLLECTION,
                ids.len(),
                docs.len()
            );
        }
        ids.into_iter()
            .zip(docs)
            .map(|(id, doc)| Self::decode(id, doc))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(Self::decode(id.to_owned(), doc)?)),
            None => Ok(None),
        }
    }

    /// Merge the serialized fields of `patch` and stamp `updated_at`;
    /// returns the stored record afterwards, or None if it does not exist
    pub async fn patch<P: Serialize>(&self, id: &str, patch: &P) -> Result<Option<T>> {
        let mut doc = to_document(patch)?;
        for field in T::DERIVED {
            doc.remove(*field);
        }
        doc.remove("id");
        doc.insert(
            "updated_at".to_owned(),
            serde_json::to_value(Utc::now())?,
        );
        if !self.store.update(T::COLLECTION, id, doc).await? {
            return Ok(None);
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(T::COLLECTION, id).await
    }

    pub async fn find(&self, filters: &[FieldFilter]) -> Result<Vec<T>> {
        self.store
            .list(T::COLLECTION, filters)
            .await?
            .into_iter()
            .map(|(id, doc)| Self::decode(id, doc))
            .collect()
    }

    pub async fn all(&self) -> Result<Vec<T>> {
        self.find(&[]).await
    }

    /// Apply a ship scope on `ship_field` on top of `filters`
    pub async fn find_scoped(
        &self,
        scope: &ShipScope,
        ship_field: &str,
        mut filters: Vec<FieldFilter>,
    ) -> Result<Vec<T>> {
        match scope {
            ShipScope::Nothing => Ok(Vec::new()),
            ShipScope::All => self.find(&filters).await,
            ShipScope::Ship(ship_id) => {
                filters.push(FieldFilter::eq(ship_field, ship_id));
                self.find(&filters).await
            }
        }
    }
}

/// Serialize any value that must be a JSON object into a document
pub fn to_document<S: Serialize + ?Sized>(value: &S) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => bail!("expected a JSON object, got {other}"),
    }
}
