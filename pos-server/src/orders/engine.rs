//! OrderEngine - order lifecycle and resource synchronization
//!
//! Owns every write that touches an order together with the table or
//! courier it holds:
//!
//! ```text
//! create_order(data)
//!     ├─ 1. Validate items, compute exact total
//!     ├─ 2. Resolve table / courier / customer references
//!     ├─ 3. Lock table, lock + claim courier (conditional update)
//!     ├─ 4. Occupy table
//!     ├─ 5. Allocate order number and insert
//!     └─ 6. On insert failure: restore table, release courier
//!
//! set_status(id, target)
//!     ├─ 1. Read order, check transition
//!     ├─ 2. Conditional update on observed status + courier
//!     │     (lost race → re-read, bounded)
//!     └─ 3. Winner of a terminal transition releases table / courier
//! ```
//!
//! Table and courier locks are always taken in that order and never while
//! holding the number allocator.

use serde_json::json;
use shared::models::{Courier, Customer, DiningTable, Order, OrderCreate, OrderStatus};
use shared::util::{new_id, now_millis};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use super::error::{OrderError, OrderResult};
use super::lifecycle::{Transition, check_transition};
use super::locks::ResourceLocks;
use super::money;
use super::numbering::OrderNumberAllocator;
use crate::repository::{
    CourierRepository, CustomerRepository, DiningTableRepository, OrderRepository,
};
use crate::store::{DocumentStore, StoreError};

/// Bound on re-reads after losing a conditional update
const MAX_CAS_ATTEMPTS: u32 = 5;

fn table_key(id: &str) -> String {
    format!("table:{}", id)
}

fn courier_key(id: &str) -> String {
    format!("courier:{}", id)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Clone)]
pub struct OrderEngine {
    orders: OrderRepository,
    tables: DiningTableRepository,
    couriers: CourierRepository,
    customers: CustomerRepository,
    numbers: Arc<OrderNumberAllocator>,
    locks: Arc<ResourceLocks>,
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("numbers", &self.numbers)
            .finish_non_exhaustive()
    }
}

impl OrderEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            orders: OrderRepository::new(store.clone()),
            tables: DiningTableRepository::new(store.clone()),
            couriers: CourierRepository::new(store.clone()),
            customers: CustomerRepository::new(store),
            numbers: Arc::new(OrderNumberAllocator::new()),
            locks: Arc::new(ResourceLocks::new()),
        }
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    // ========== Create ==========

    pub async fn create_order(&self, data: OrderCreate) -> OrderResult<Order> {
        let items = money::validate_items(&data.items)?;
        let total_amount = money::order_total(&items);

        let table = match &data.table_id {
            Some(id) => Some(self.resolve_table(id).await?),
            None => None,
        };
        let courier = match &data.courier_id {
            Some(id) => {
                let courier = self.resolve_courier(id).await?;
                if !courier.is_assignable() {
                    return Err(OrderError::CourierUnavailable(courier.id));
                }
                Some(courier)
            }
            None => None,
        };
        let customer = match &data.customer_id {
            Some(id) => Some(self.resolve_customer(id).await?),
            None => None,
        };

        let (customer_name, customer_phone, customer_address) = match customer {
            Some(c) => (
                Some(c.name),
                non_blank(c.phone).or(non_blank(data.customer_phone)),
                non_blank(c.address).or(non_blank(data.customer_address)),
            ),
            None => (
                non_blank(data.customer_name),
                non_blank(data.customer_phone),
                non_blank(data.customer_address),
            ),
        };

        // Held until the order is persisted or compensated
        let _table_guard = match &table {
            Some(t) => Some(self.locks.lock(&table_key(&t.id)).await),
            None => None,
        };
        let _courier_guard = match &courier {
            Some(c) => Some(self.claim_courier(&c.id).await?),
            None => None,
        };

        let was_occupied = match &table {
            Some(t) => match self.occupy_table(&t.id).await {
                Ok(previous) => previous,
                Err(e) => {
                    if let Some(c) = &courier {
                        self.compensate_courier(&c.id).await;
                    }
                    return Err(e);
                }
            },
            None => false,
        };

        let now = now_millis();
        let order = Order {
            id: new_id(),
            order_number: String::new(),
            items,
            total_amount,
            status: OrderStatus::Pending,
            order_type: data.order_type,
            table_id: table.as_ref().map(|t| t.id.clone()),
            table_name: table.as_ref().map(DiningTable::display_name),
            courier_id: courier.as_ref().map(|c| c.id.clone()),
            courier_name: courier.as_ref().map(Courier::full_name),
            customer_id: data.customer_id,
            customer_name,
            customer_phone,
            customer_address,
            notes: non_blank(data.notes),
            created_at: now,
            updated_at: now,
        };

        match self.numbers.insert_numbered(&self.orders, order).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    order_number = %order.order_number,
                    total = %order.total_amount,
                    "Order created"
                );
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order insert failed, compensating");
                if let Some(t) = &table
                    && !was_occupied
                    && let Err(ce) = self.tables.set_occupied(&t.id, false).await
                {
                    tracing::error!(table_id = %t.id, error = %ce, "Failed to restore table");
                }
                if let Some(c) = &courier {
                    self.compensate_courier(&c.id).await;
                }
                Err(e)
            }
        }
    }

    // ========== Status ==========

    pub async fn set_status(&self, order_id: &str, target: OrderStatus) -> OrderResult<Order> {
        self.transition(order_id, target, None).await
    }

    /// Apply a status change, optionally restricted to the assigned courier.
    ///
    /// Only the writer whose conditional update succeeds runs the resource
    /// release, so a repeated terminal call never releases twice.
    async fn transition(
        &self,
        order_id: &str,
        target: OrderStatus,
        acting_courier: Option<&str>,
    ) -> OrderResult<Order> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let order = self.load_order(order_id).await?;

            if let Some(courier_id) = acting_courier
                && order.courier_id.as_deref() != Some(courier_id)
            {
                return Err(OrderError::NotAssigned {
                    order_id: order.id,
                    courier_id: courier_id.to_string(),
                });
            }

            if check_transition(order.status, target)? == Transition::Unchanged {
                return Ok(order);
            }

            match self.orders.update_status(&order, target, now_millis()).await {
                Ok(updated) => {
                    tracing::info!(
                        order_id = %updated.id,
                        from = %order.status,
                        to = %target,
                        "Order status changed"
                    );
                    if target.is_terminal() {
                        self.release_resources(&updated).await;
                    }
                    return Ok(updated);
                }
                Err(StoreError::PreconditionFailed { .. }) => {
                    tracing::debug!(order_id, attempt, "Status update lost race, re-reading");
                }
                Err(StoreError::NotFound { .. }) => {
                    return Err(OrderError::OrderNotFound(order_id.to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(OrderError::Conflict(order_id.to_string()))
    }

    // ========== Courier assignment ==========

    /// Admin assignment; reassigning releases the previous courier
    pub async fn assign_courier(&self, order_id: &str, courier_id: &str) -> OrderResult<Order> {
        let order = self.load_order(order_id).await?;
        let courier = self.resolve_courier(courier_id).await?;

        if order.status.is_terminal() {
            return Err(OrderError::OrderClosed(order.id));
        }
        if order.courier_id.as_deref() == Some(courier_id) {
            return Ok(order);
        }
        if !courier.is_assignable() {
            return Err(OrderError::CourierUnavailable(courier.id));
        }

        let guard = self.claim_courier(&courier.id).await?;
        let changes = json!({
            "courier_id": courier.id,
            "courier_name": courier.full_name(),
            "updated_at": now_millis(),
        });
        let updated = match self.orders.update_observed(&order, changes).await {
            Ok(updated) => updated,
            Err(e) => {
                self.compensate_courier(&courier.id).await;
                return Err(match e {
                    StoreError::PreconditionFailed { .. } => OrderError::Conflict(order.id),
                    StoreError::NotFound { .. } => OrderError::OrderNotFound(order.id),
                    other => other.into(),
                });
            }
        };
        drop(guard);

        tracing::info!(order_id = %updated.id, courier_id, "Courier assigned");

        if let Some(previous) = &order.courier_id
            && let Err(e) = self.release_courier(previous, &order.id).await
        {
            tracing::error!(courier_id = %previous, error = %e, "Failed to release previous courier");
        }
        Ok(updated)
    }

    /// Courier claims an unclaimed takeaway/delivery order.
    ///
    /// Exactly one concurrent caller wins; the others see `AlreadyClaimed`.
    pub async fn courier_take_order(&self, courier_id: &str, order_id: &str) -> OrderResult<Order> {
        let order = self.load_order(order_id).await?;

        if !order.order_type.is_courier_fulfilled() {
            return Err(OrderError::NotDeliverable(order.id));
        }
        if order.status.is_terminal() {
            return Err(OrderError::OrderClosed(order.id));
        }
        match order.courier_id.as_deref() {
            Some(current) if current == courier_id => return Ok(order),
            Some(_) => return Err(OrderError::AlreadyClaimed(order.id)),
            None => {}
        }

        let courier = self.resolve_courier(courier_id).await?;
        let guard = self.claim_courier(&courier.id).await?;

        let status = if order.status == OrderStatus::Pending {
            OrderStatus::Preparing
        } else {
            order.status
        };
        let changes = json!({
            "courier_id": courier.id,
            "courier_name": courier.full_name(),
            "status": status,
            "updated_at": now_millis(),
        });

        match self.orders.update_observed(&order, changes).await {
            Ok(updated) => {
                drop(guard);
                tracing::info!(order_id = %updated.id, courier_id, "Order taken by courier");
                Ok(updated)
            }
            Err(StoreError::PreconditionFailed { .. }) => {
                self.compensate_courier(&courier.id).await;
                drop(guard);
                let current = self.load_order(order_id).await?;
                if current.courier_id.is_some() {
                    tracing::debug!(order_id, courier_id, "Order claimed by another courier");
                    Err(OrderError::AlreadyClaimed(current.id))
                } else {
                    Err(OrderError::Conflict(current.id))
                }
            }
            Err(e) => {
                self.compensate_courier(&courier.id).await;
                Err(match e {
                    StoreError::NotFound { .. } => OrderError::OrderNotFound(order_id.to_string()),
                    other => other.into(),
                })
            }
        }
    }

    pub async fn courier_deliver(&self, courier_id: &str, order_id: &str) -> OrderResult<Order> {
        self.transition(order_id, OrderStatus::Delivered, Some(courier_id))
            .await
    }

    pub async fn courier_cancel(&self, courier_id: &str, order_id: &str) -> OrderResult<Order> {
        self.transition(order_id, OrderStatus::Cancelled, Some(courier_id))
            .await
    }

    /// Delete a courier that holds no active order.
    ///
    /// Runs under the courier lock so no claim can land between the check
    /// and the delete.
    pub async fn delete_courier(&self, courier_id: &str) -> OrderResult<Courier> {
        let _guard = self.locks.lock(&courier_key(courier_id)).await;
        let courier = self.resolve_courier(courier_id).await?;

        let active = self
            .orders
            .count_active_for_courier(courier_id, None)
            .await?;
        if active > 0 {
            return Err(OrderError::CourierBusy {
                courier_id: courier.id,
                active,
            });
        }

        self.couriers.delete(courier_id).await?;
        tracing::info!(courier_id, "Courier deleted");
        Ok(courier)
    }

    // ========== Purge ==========

    /// Delete exactly `orders`, then free what the active ones held
    pub async fn purge(&self, orders: &[Order]) -> OrderResult<u64> {
        let ids = orders.iter().map(|o| o.id.clone()).collect();
        let deleted = self.orders.delete_many(ids).await?;

        for order in orders.iter().filter(|o| o.is_active()) {
            self.release_resources(order).await;
        }

        tracing::info!(deleted, "Orders purged");
        Ok(deleted)
    }

    // ========== Resource sync ==========

    /// Free the table and courier held by `order`.
    ///
    /// Failures are logged; the status change that triggered the release
    /// is already committed.
    async fn release_resources(&self, order: &Order) {
        if let Some(table_id) = &order.table_id
            && let Err(e) = self.release_table(table_id, &order.id).await
        {
            tracing::error!(order_id = %order.id, table_id = %table_id, error = %e, "Failed to release table");
        }
        if let Some(courier_id) = &order.courier_id
            && let Err(e) = self.release_courier(courier_id, &order.id).await
        {
            tracing::error!(order_id = %order.id, courier_id = %courier_id, error = %e, "Failed to release courier");
        }
    }

    /// Unoccupy the table unless another active order still sits on it
    async fn release_table(&self, table_id: &str, order_id: &str) -> OrderResult<()> {
        let _guard = self.locks.lock(&table_key(table_id)).await;
        let others = self.orders.count_active_on_table(table_id, order_id).await?;
        if others > 0 {
            tracing::debug!(table_id, others, "Table still in use, keeping occupied");
            return Ok(());
        }
        match self.tables.set_occupied(table_id, false).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(table_id, "Table gone, nothing to release");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Make the courier available unless another active order holds them
    async fn release_courier(&self, courier_id: &str, order_id: &str) -> OrderResult<()> {
        let _guard = self.locks.lock(&courier_key(courier_id)).await;
        let others = self
            .orders
            .count_active_for_courier(courier_id, Some(order_id))
            .await?;
        if others > 0 {
            tracing::debug!(courier_id, others, "Courier still busy, keeping unavailable");
            return Ok(());
        }
        match self.couriers.set_availability(courier_id, true).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound { .. }) => {
                tracing::warn!(courier_id, "Courier gone, nothing to release");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Lock the courier and flip them to unavailable if still assignable
    async fn claim_courier(&self, courier_id: &str) -> OrderResult<OwnedMutexGuard<()>> {
        let guard = self.locks.lock(&courier_key(courier_id)).await;
        match self.couriers.claim(courier_id).await {
            Ok(_) => Ok(guard),
            Err(StoreError::PreconditionFailed { .. }) => {
                Err(OrderError::CourierUnavailable(courier_id.to_string()))
            }
            Err(StoreError::NotFound { .. }) => {
                Err(OrderError::CourierNotFound(courier_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Undo a claim made for an operation that did not complete
    async fn compensate_courier(&self, courier_id: &str) {
        if let Err(e) = self.couriers.set_availability(courier_id, true).await {
            tracing::error!(courier_id, error = %e, "Failed to roll back courier claim");
        }
    }

    /// Mark occupied; returns whether it already was
    async fn occupy_table(&self, table_id: &str) -> OrderResult<bool> {
        let current = self.resolve_table(table_id).await?;
        if !current.is_occupied {
            self.tables.set_occupied(table_id, true).await?;
        }
        Ok(current.is_occupied)
    }

    // ========== Lookups ==========

    async fn load_order(&self, id: &str) -> OrderResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(id.to_string()))
    }

    async fn resolve_table(&self, id: &str) -> OrderResult<DiningTable> {
        self.tables
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::TableNotFound(id.to_string()))
    }

    async fn resolve_courier(&self, id: &str) -> OrderResult<Courier> {
        self.couriers
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::CourierNotFound(id.to_string()))
    }

    async fn resolve_customer(&self, id: &str) -> OrderResult<Customer> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| OrderError::CustomerNotFound(id.to_string()))
    }
}
