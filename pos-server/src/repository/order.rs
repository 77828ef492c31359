//! Order Repository

use serde_json::{Value, json};
use shared::models::{Order, OrderStatus};
use std::sync::Arc;

use super::BaseRepository;
use crate::store::{Collection, DocumentStore, Filter, Query, SortOrder, StoreResult};

/// Matches orders that still hold resources
pub fn active_filter() -> Filter {
    Filter::one_of("status", OrderStatus::ACTIVE.iter().map(|s| s.as_str()))
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store, Collection::Orders),
        }
    }

    /// Fails with a duplicate error if `order_number` is taken
    pub async fn insert(&self, order: &Order) -> StoreResult<()> {
        self.base.insert(order).await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Order>> {
        self.base.get(id).await
    }

    /// Newest first, optionally filtered by status
    pub async fn find_all(
        &self,
        status: Option<OrderStatus>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Order>> {
        let filter = match status {
            Some(status) => Filter::eq("status", status.as_str()),
            None => Filter::All,
        };
        let mut query = Query::new(filter).sort_by("created_at", SortOrder::Desc);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        self.base.find(query).await
    }

    /// Orders created within `[start, end)` (UTC millis), oldest first
    pub async fn find_created_between(&self, start: i64, end: i64) -> StoreResult<Vec<Order>> {
        self.base
            .find(
                Query::new(Filter::range("created_at", Some(start), Some(end)))
                    .sort_by("created_at", SortOrder::Asc),
            )
            .await
    }

    pub async fn find_by_courier(&self, courier_id: &str) -> StoreResult<Vec<Order>> {
        self.base
            .find(
                Query::new(Filter::eq("courier_id", courier_id))
                    .sort_by("created_at", SortOrder::Desc),
            )
            .await
    }

    /// Unclaimed, active, courier-fulfilled orders, oldest first
    pub async fn find_open_packages(&self) -> StoreResult<Vec<Order>> {
        let filter = active_filter()
            .and(Filter::is_null("courier_id"))
            .and(Filter::one_of("order_type", ["takeaway", "delivery"]));
        self.base
            .find(Query::new(filter).sort_by("created_at", SortOrder::Asc))
            .await
    }

    pub async fn count(&self, filter: Filter) -> StoreResult<u64> {
        self.base.count(filter).await
    }

    pub async fn count_with_number_prefix(&self, prefix: &str) -> StoreResult<u64> {
        self.base.count(Filter::prefix("order_number", prefix)).await
    }

    /// Active orders on the table, other than `excluding`
    pub async fn count_active_on_table(&self, table_id: &str, excluding: &str) -> StoreResult<u64> {
        let orders: Vec<Order> = self
            .base
            .find(Query::new(active_filter().and(Filter::eq("table_id", table_id))))
            .await?;
        Ok(orders.iter().filter(|o| o.id != excluding).count() as u64)
    }

    /// Active orders assigned to the courier, other than `excluding`
    pub async fn count_active_for_courier(
        &self,
        courier_id: &str,
        excluding: Option<&str>,
    ) -> StoreResult<u64> {
        let orders: Vec<Order> = self
            .base
            .find(Query::new(
                active_filter().and(Filter::eq("courier_id", courier_id)),
            ))
            .await?;
        Ok(orders
            .iter()
            .filter(|o| Some(o.id.as_str()) != excluding)
            .count() as u64)
    }

    /// Conditional update guarded by the observed status and courier.
    ///
    /// Fails with a precondition error if either changed since `observed`
    /// was read.
    pub async fn update_observed(&self, observed: &Order, changes: Value) -> StoreResult<Order> {
        let courier = match &observed.courier_id {
            Some(id) => Filter::eq("courier_id", id.as_str()),
            None => Filter::is_null("courier_id"),
        };
        let precondition = Filter::eq("status", observed.status.as_str()).and(courier);
        self.base.update(&observed.id, precondition, changes).await
    }

    /// Status change guarded by the observed status and courier
    pub async fn update_status(
        &self,
        observed: &Order,
        status: OrderStatus,
        now: i64,
    ) -> StoreResult<Order> {
        self.update_observed(observed, json!({ "status": status, "updated_at": now }))
            .await
    }

    pub async fn delete_many(&self, ids: Vec<String>) -> StoreResult<u64> {
        self.base.delete_many(ids).await
    }
}
