//! Dining Table Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table
///
/// `is_occupied` is driven by the order lifecycle; the only direct write is
/// the manual override endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub number: u32,
    pub capacity: u32,
    pub is_occupied: bool,
    pub created_at: i64,
}

impl DiningTable {
    /// Name snapshotted onto orders
    pub fn display_name(&self) -> String {
        format!("Table {}", self.number)
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiningTableCreate {
    #[validate(range(min = 1, message = "table number must be positive"))]
    pub number: u32,
    #[validate(range(min = 1, max = 100, message = "capacity must be between 1 and 100"))]
    pub capacity: u32,
}

/// Manual occupancy override payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub is_occupied: bool,
}
