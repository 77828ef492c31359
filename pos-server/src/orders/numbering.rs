//! Order number allocation
//!
//! Numbers have the form `SIP-YYYYMMDD-NNNN`: the UTC calendar day of
//! creation and a per-day sequence starting at 1. Uniqueness is enforced by
//! the store's unique index on `order_number`; the allocator serializes
//! in-process allocation and retries when another writer got there first.

use chrono::{DateTime, Utc};
use shared::models::Order;
use tokio::sync::Mutex;

use super::error::{OrderError, OrderResult};
use crate::repository::OrderRepository;
use crate::store::StoreError;

pub const NUMBER_PREFIX: &str = "SIP";
pub const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

/// `SIP-YYYYMMDD-` for the UTC day containing `millis`
pub fn day_prefix(millis: i64) -> String {
    let day = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
    format!("{}-{}-", NUMBER_PREFIX, day.format("%Y%m%d"))
}

pub fn format_number(prefix: &str, sequence: u64) -> String {
    format!("{}{:04}", prefix, sequence)
}

#[derive(Debug, Default)]
pub struct OrderNumberAllocator {
    guard: Mutex<()>,
}

impl OrderNumberAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next free number to `order` and insert it.
    ///
    /// The candidate is the day's order count plus one. A candidate rejected
    /// as duplicate is never proposed again; the next attempt starts above
    /// it.
    pub async fn insert_numbered(
        &self,
        repo: &OrderRepository,
        mut order: Order,
    ) -> OrderResult<Order> {
        let _allocation = self.guard.lock().await;
        let prefix = day_prefix(order.created_at);
        let mut last_rejected: Option<u64> = None;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            let counted = repo.count_with_number_prefix(&prefix).await? + 1;
            let candidate = match last_rejected {
                Some(rejected) if counted <= rejected => rejected + 1,
                _ => counted,
            };
            order.order_number = format_number(&prefix, candidate);

            match repo.insert(&order).await {
                Ok(()) => return Ok(order),
                Err(StoreError::Duplicate {
                    field: "order_number",
                    ..
                }) => {
                    tracing::debug!(
                        order_number = %order.order_number,
                        attempt,
                        "Order number taken, retrying"
                    );
                    last_rejected = Some(candidate);
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(prefix = %prefix, "Order number allocation exhausted");
        Err(OrderError::NumberExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }
}
