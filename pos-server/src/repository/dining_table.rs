//! Dining Table Repository

use serde_json::json;
use shared::models::{DiningTable, DiningTableCreate};
use shared::util::{new_id, now_millis};
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreResult};

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Tables),
        }
    }

    pub async fn create(&self, data: DiningTableCreate) -> StoreResult<DiningTable> {
        let table = DiningTable {
            id: new_id(),
            number: data.number,
            capacity: data.capacity,
            is_occupied: false,
            created_at: now_millis(),
        };
        self.base.insert(&table).await?;
        Ok(table)
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<DiningTable>> {
        self.base.get(id).await
    }

    /// All tables ordered by number
    pub async fn find_all(&self) -> StoreResult<Vec<DiningTable>> {
        self.base
            .find(Query::all().sort_by("number", SortOrder::Asc))
            .await
    }

    pub async fn set_occupied(&self, id: &str, is_occupied: bool) -> StoreResult<DiningTable> {
        self.base
            .update(id, Filter::All, json!({ "is_occupied": is_occupied }))
            .await
    }

    pub async fn count_occupied(&self) -> StoreResult<u64> {
        self.base.count(Filter::eq("is_occupied", true)).await
    }
}
