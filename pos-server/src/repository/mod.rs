//! Repository Module
//!
//! Typed accessors over the [`DocumentStore`]. Records are converted to and
//! from JSON documents here, so nothing above this layer handles untyped
//! maps.

pub mod category;
pub mod courier;
pub mod customer;
pub mod dining_table;
pub mod order;
pub mod product;
pub mod user;

pub use category::CategoryRepository;
pub use courier::CourierRepository;
pub use customer::CustomerRepository;
pub use dining_table::DiningTableRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::store::{
    Collection, Document, DocumentStore, Filter, Query, StoreError, StoreResult,
};

/// Convert a record into a store document
pub fn to_document<T: Serialize>(record: &T) -> StoreResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected object, got {}",
            other
        ))),
    }
}

/// Convert a store document into a record
pub fn from_document<T: DeserializeOwned>(doc: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// Build a patch document from a `json!` object literal
pub fn patch(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// Base repository bound to one collection
#[derive(Clone)]
pub struct BaseRepository {
    store: Arc<dyn DocumentStore>,
    collection: Collection,
}

impl BaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.get(self.collection, id).await? {
            Some(doc) => Ok(Some(from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn find<T: DeserializeOwned>(&self, query: Query) -> StoreResult<Vec<T>> {
        self.store
            .find(self.collection, query)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn count(&self, filter: Filter) -> StoreResult<u64> {
        self.store.count(self.collection, filter).await
    }

    pub async fn insert<T: Serialize>(&self, record: &T) -> StoreResult<()> {
        self.store.insert(self.collection, to_document(record)?).await
    }

    pub async fn update<T: DeserializeOwned>(
        &self,
        id: &str,
        precondition: Filter,
        changes: Value,
    ) -> StoreResult<T> {
        let doc = self
            .store
            .update(self.collection, id, precondition, patch(changes))
            .await?;
        from_document(doc)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.store.delete(self.collection, id).await
    }

    pub async fn delete_many(&self, ids: Vec<String>) -> StoreResult<u64> {
        self.store.delete_many(self.collection, ids).await
    }
}
