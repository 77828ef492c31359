//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status
///
/// `pending → preparing → ready → delivered`, with `cancelled` reachable from
/// any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Statuses that still hold a table or courier
    pub const ACTIVE: [OrderStatus; 3] = [Self::Pending, Self::Preparing, Self::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// `delivered` and `cancelled` accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised for status strings outside the lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// How the order is fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DineIn => "dine-in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }

    /// Takeaway and delivery orders are handed to couriers
    pub fn is_courier_fulfilled(&self) -> bool {
        matches!(self, Self::Takeaway | Self::Delivery)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line item; `price` is the unit price captured when the order was placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub product_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Placed order
///
/// `table_name`, `courier_name` and the customer fields are snapshots taken
/// when the reference was attached; they are never re-read from the source
/// entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_type: OrderType,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub courier_id: Option<String>,
    #[serde(default)]
    pub courier_name: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Unclaimed, still open and meant for a courier
    pub fn is_open_package(&self) -> bool {
        self.order_type.is_courier_fulfilled() && self.courier_id.is_none() && self.is_active()
    }
}

/// Incoming line item
///
/// Quantity is signed so that out-of-range values reach validation instead
/// of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub price: Decimal,
}

/// Create order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub order_type: OrderType,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub courier_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Status change payload; the raw string is parsed by the handler so an
/// unknown value maps to a 400 instead of a body rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Courier assignment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignCourier {
    pub courier_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::ACTIVE.iter().all(|s| !s.is_terminal()));
    }

    #[test]
    fn test_order_type_serde() {
        let json = serde_json::to_string(&OrderType::DineIn).unwrap();
        assert_eq!(json, "\"dine-in\"");
        let parsed: OrderType = serde_json::from_str("\"takeaway\"").unwrap();
        assert!(parsed.is_courier_fulfilled());
        assert!(!OrderType::DineIn.is_courier_fulfilled());
    }

    #[test]
    fn test_line_total_is_exact() {
        let item = OrderItem {
            product_id: "p".into(),
            product_name: "Soup".into(),
            quantity: 3,
            price: Decimal::new(110, 2),
        };
        assert_eq!(item.line_total(), Decimal::new(330, 2));
    }
}
