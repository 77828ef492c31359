//! Customer Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Customer contact record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: i64,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerCreate {
    #[validate(length(min = 1, max = 200, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
}
