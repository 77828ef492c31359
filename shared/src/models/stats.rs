//! Statistics views

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub today_orders: u64,
    pub today_revenue: Decimal,
    pub pending_orders: u64,
    pub preparing_orders: u64,
    pub occupied_tables: u64,
    pub available_couriers: u64,
}

/// Monthly or yearly summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub average_order: Decimal,
}

/// Delivered work per courier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierStats {
    pub courier_id: String,
    pub courier_name: String,
    pub delivered_orders: u64,
    pub total_revenue: Decimal,
}

/// Courier's own daily summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierSelfStats {
    pub deliveries_today: u64,
    pub revenue_today: Decimal,
    pub active_orders: u64,
}
