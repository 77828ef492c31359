//! Document store
//!
//! Collections of JSON documents keyed by id, behind the object-safe
//! [`DocumentStore`] trait so the server and tests share one interface.
//!
//! | Operation | Semantics |
//! |-----------|-----------|
//! | `get` | point lookup by id |
//! | `find` | filtered scan with optional sort and limit |
//! | `count` | number of documents matching a filter |
//! | `insert` | new document, unique indexes enforced |
//! | `update` | partial patch applied only if the precondition matches |
//! | `delete` / `delete_many` | remove by id |
//!
//! Every operation completes or fails within the store's timeout.

mod error;
mod query;
mod redb_store;

pub use error::{StoreError, StoreResult};
pub use query::{Filter, Query, SortOrder};
pub use redb_store::RedbStore;

use async_trait::async_trait;

/// A stored document: a JSON object with a string `id` field
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Products,
    Tables,
    Couriers,
    Customers,
    Users,
    Orders,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Self::Categories,
        Self::Products,
        Self::Tables,
        Self::Couriers,
        Self::Customers,
        Self::Users,
        Self::Orders,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Tables => "tables",
            Self::Couriers => "couriers",
            Self::Customers => "customers",
            Self::Users => "users",
            Self::Orders => "orders",
        }
    }

    /// Fields whose values must be unique within the collection
    pub fn unique_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Users => &["username"],
            Self::Orders => &["order_number"],
            Self::Tables => &["number"],
            _ => &[],
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    async fn find(&self, collection: Collection, query: Query) -> StoreResult<Vec<Document>>;

    async fn count(&self, collection: Collection, filter: Filter) -> StoreResult<u64>;

    /// Fails with [`StoreError::Duplicate`] if the id or a unique field is taken
    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()>;

    /// Merge `patch` into the document iff `precondition` matches it.
    ///
    /// Returns the updated document. A mismatch yields
    /// [`StoreError::PreconditionFailed`] and leaves the document untouched.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        precondition: Filter,
        patch: Document,
    ) -> StoreResult<Document>;

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool>;

    async fn delete_many(&self, collection: Collection, ids: Vec<String>) -> StoreResult<u64>;
}
