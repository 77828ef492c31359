//! Order status transitions
//!
//! ```text
//! pending → preparing → ready → delivered
//!    └──────────┴─────────┴──→ cancelled
//! ```
//!
//! Forward moves may skip steps. Re-applying the current status is a no-op.
//! Nothing leaves `delivered` or `cancelled`.

use shared::models::OrderStatus;

use super::error::{OrderError, OrderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals the current status; nothing to write
    Unchanged,
    /// Status must be written
    Advance,
}

fn rank(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Pending => 0,
        OrderStatus::Preparing => 1,
        OrderStatus::Ready => 2,
        OrderStatus::Delivered | OrderStatus::Cancelled => 3,
    }
}

pub fn check_transition(from: OrderStatus, to: OrderStatus) -> OrderResult<Transition> {
    if from == to {
        return Ok(Transition::Unchanged);
    }
    if from.is_terminal() {
        return Err(OrderError::InvalidTransition { from, to });
    }
    if to == OrderStatus::Cancelled || rank(to) > rank(from) {
        Ok(Transition::Advance)
    } else {
        Err(OrderError::InvalidTransition { from, to })
    }
}
