//! Money calculation using rust_decimal
//!
//! Totals are exact decimal sums of `quantity × unit price`; nothing is
//! rounded or converted through floating point.

use rust_decimal::Decimal;
use shared::models::{OrderItem, OrderItemInput};

use super::error::{OrderError, OrderResult};

/// Maximum allowed unit price
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per line
const MAX_QUANTITY: i64 = 9999;

/// Validate incoming lines and capture them as order items
pub fn validate_items(items: &[OrderItemInput]) -> OrderResult<Vec<OrderItem>> {
    if items.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.quantity < 1 {
                return Err(OrderError::InvalidQuantity {
                    index,
                    quantity: item.quantity,
                });
            }
            if item.quantity > MAX_QUANTITY {
                return Err(OrderError::Validation(format!(
                    "item {}: quantity exceeds maximum allowed ({})",
                    index, MAX_QUANTITY
                )));
            }
            if item.price.is_sign_negative() && !item.price.is_zero() {
                return Err(OrderError::InvalidPrice {
                    index,
                    reason: format!("price must be non-negative, got {}", item.price),
                });
            }
            if item.price > MAX_PRICE {
                return Err(OrderError::InvalidPrice {
                    index,
                    reason: format!("price exceeds maximum allowed ({})", MAX_PRICE),
                });
            }
            if item.product_id.trim().is_empty() {
                return Err(OrderError::Validation(format!(
                    "item {}: product_id is required",
                    index
                )));
            }
            Ok(OrderItem {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                quantity: item.quantity as u32,
                price: item.price,
            })
        })
        .collect()
}

/// Exact sum of line totals
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(OrderItem::line_total).sum()
}
