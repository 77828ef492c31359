//! Category Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Menu category
///
/// Deactivated categories stay in the store; default listings hide them and
/// their products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 100, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
