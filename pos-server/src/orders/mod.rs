//! Order Lifecycle Module
//!
//! - **engine**: `OrderEngine`, every order write plus table/courier sync
//! - **lifecycle**: status transition rules
//! - **numbering**: `SIP-YYYYMMDD-NNNN` allocation
//! - **money**: item validation and exact totals
//! - **locks**: per-table / per-courier async locks
//!
//! # Resource Model
//!
//! ```text
//! create_order ──occupy──→ Table     (is_occupied = true)
//!              ──claim───→ Courier   (is_available = false)
//!
//! delivered / cancelled ──release──→ Table, Courier
//! ```

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod locks;
pub mod money;
pub mod numbering;

pub use engine::OrderEngine;
pub use error::{OrderError, OrderResult};
pub use numbering::OrderNumberAllocator;

#[cfg(test)]
mod tests;
