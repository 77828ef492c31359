//! Category Repository

use serde_json::json;
use shared::models::{Category, CategoryCreate};
use shared::util::{new_id, now_millis};
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreResult};

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Categories),
        }
    }

    pub async fn create(&self, data: CategoryCreate) -> StoreResult<Category> {
        let category = Category {
            id: new_id(),
            name: data.name,
            description: data.description,
            is_active: true,
            created_at: now_millis(),
        };
        self.base.insert(&category).await?;
        Ok(category)
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Category>> {
        self.base.get(id).await
    }

    pub async fn find_all(&self, active_only: bool) -> StoreResult<Vec<Category>> {
        let filter = if active_only {
            Filter::eq("is_active", true)
        } else {
            Filter::All
        };
        self.base
            .find(Query::new(filter).sort_by("name", SortOrder::Asc))
            .await
    }

    /// Soft delete: the category and its products stay in the store
    pub async fn deactivate(&self, id: &str) -> StoreResult<Category> {
        self.base
            .update(id, Filter::All, json!({ "is_active": false }))
            .await
    }
}
