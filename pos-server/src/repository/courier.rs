//! Courier Repository

use serde_json::json;
use shared::models::Courier;
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreResult};

#[derive(Clone)]
pub struct CourierRepository {
    base: BaseRepository,
}

impl CourierRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Couriers),
        }
    }

    pub async fn insert(&self, courier: &Courier) -> StoreResult<()> {
        self.base.insert(courier).await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Courier>> {
        self.base.get(id).await
    }

    pub async fn find_all(&self, available_only: bool) -> StoreResult<Vec<Courier>> {
        let filter = if available_only {
            Filter::eq("is_available", true).and(Filter::eq("is_approved", true))
        } else {
            Filter::All
        };
        self.base
            .find(Query::new(filter).sort_by("created_at", SortOrder::Asc))
            .await
    }

    /// Couriers waiting for admin approval
    pub async fn find_pending(&self) -> StoreResult<Vec<Courier>> {
        self.base
            .find(Query::new(Filter::eq("is_approved", false)).sort_by("created_at", SortOrder::Asc))
            .await
    }

    /// Atomically take an approved, available courier.
    ///
    /// Fails with a precondition error if the courier is busy or unapproved.
    pub async fn claim(&self, id: &str) -> StoreResult<Courier> {
        let claimable = Filter::eq("is_available", true).and(Filter::eq("is_approved", true));
        self.base
            .update(id, claimable, json!({ "is_available": false }))
            .await
    }

    pub async fn set_availability(&self, id: &str, is_available: bool) -> StoreResult<Courier> {
        self.base
            .update(id, Filter::All, json!({ "is_available": is_available }))
            .await
    }

    pub async fn set_approved(&self, id: &str, is_approved: bool) -> StoreResult<Courier> {
        self.base
            .update(id, Filter::All, json!({ "is_approved": is_approved }))
            .await
    }

    pub async fn count_available(&self) -> StoreResult<u64> {
        self.base
            .count(Filter::eq("is_available", true).and(Filter::eq("is_approved", true)))
            .await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.base.delete(id).await
    }
}
