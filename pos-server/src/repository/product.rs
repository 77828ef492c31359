//! Product Repository

use serde_json::json;
use shared::models::Product;
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreResult};

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Products),
        }
    }

    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        self.base.insert(product).await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        self.base.get(id).await
    }

    pub async fn find_all(
        &self,
        category_id: Option<&str>,
        available_only: bool,
    ) -> StoreResult<Vec<Product>> {
        let mut filter = Filter::All;
        if let Some(category_id) = category_id {
            filter = filter.and(Filter::eq("category_id", category_id));
        }
        if available_only {
            filter = filter.and(Filter::eq("is_available", true));
        }
        self.base
            .find(Query::new(filter).sort_by("name", SortOrder::Asc))
            .await
    }

    pub async fn set_availability(&self, id: &str, is_available: bool) -> StoreResult<Product> {
        self.base
            .update(id, Filter::All, json!({ "is_available": is_available }))
            .await
    }
}
