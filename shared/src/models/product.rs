//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu product, belongs to exactly one [`super::Category`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: String,
    pub is_available: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Availability toggle payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_available: bool,
}
