//! Courier Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Delivery courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_plate: Option<String>,
    pub is_available: bool,
    pub is_approved: bool,
    /// Linked login account, absent for admin-created couriers
    #[serde(default)]
    pub user_id: Option<String>,
    pub created_at: i64,
}

impl Courier {
    /// Name snapshotted onto orders
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Only approved, available couriers can take work
    pub fn is_assignable(&self) -> bool {
        self.is_approved && self.is_available
    }
}

/// Admin-side courier creation (pre-approved)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CourierCreate {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 3, max = 32))]
    pub phone_number: String,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub vehicle_plate: Option<String>,
}

/// Courier availability override payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CourierAvailabilityUpdate {
    pub is_available: bool,
}
