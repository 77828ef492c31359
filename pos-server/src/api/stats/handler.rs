//! Statistics Handlers
//!
//! Revenue never includes cancelled orders; order counts do.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{CourierStats, DashboardStats, Order, OrderStatus, PeriodStats};
use shared::util::{day_bounds_millis, month_bounds_millis, now_millis, year_bounds_millis};
use std::collections::HashMap;

use crate::core::ServerState;
use crate::store::Filter;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct YearlyQuery {
    pub year: Option<i32>,
}

// ============================================================================
// Aggregation
// ============================================================================

/// Sum of non-cancelled totals
fn revenue(orders: &[Order]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .map(|o| o.total_amount)
        .sum()
}

fn period_stats(year: i32, month: Option<u32>, orders: &[Order]) -> PeriodStats {
    let total_revenue = revenue(orders);
    let billed = orders
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .count();
    let average_order = if billed == 0 {
        Decimal::ZERO
    } else {
        (total_revenue / Decimal::from(billed as u64)).round_dp(2)
    };

    PeriodStats {
        year,
        month,
        total_orders: orders.len() as u64,
        total_revenue,
        average_order,
    }
}

fn courier_stats(orders: &[Order]) -> Vec<CourierStats> {
    let mut by_courier: HashMap<&str, CourierStats> = HashMap::new();
    for order in orders.iter().filter(|o| o.status == OrderStatus::Delivered) {
        let Some(courier_id) = order.courier_id.as_deref() else {
            continue;
        };
        let entry = by_courier.entry(courier_id).or_insert_with(|| CourierStats {
            courier_id: courier_id.to_string(),
            courier_name: order.courier_name.clone().unwrap_or_default(),
            delivered_orders: 0,
            total_revenue: Decimal::ZERO,
        });
        entry.delivered_orders += 1;
        entry.total_revenue += order.total_amount;
    }

    let mut stats: Vec<CourierStats> = by_courier.into_values().collect();
    stats.sort_by(|a, b| {
        b.delivered_orders
            .cmp(&a.delivered_orders)
            .then_with(|| a.courier_name.cmp(&b.courier_name))
    });
    stats
}

fn invalid_period(year: i32, month: Option<u32>) -> AppError {
    let err = AppError::validation("Invalid period").with_detail("year", year);
    match month {
        Some(m) => err.with_detail("month", m),
        None => err,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/stats/dashboard
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let orders = state.orders();
    let (start, end) = day_bounds_millis(now_millis());
    let today = orders.find_created_between(start, end).await?;

    Ok(Json(DashboardStats {
        total_orders: orders.count(Filter::All).await?,
        today_orders: today.len() as u64,
        today_revenue: revenue(&today),
        pending_orders: orders
            .count(Filter::eq("status", OrderStatus::Pending.as_str()))
            .await?,
        preparing_orders: orders
            .count(Filter::eq("status", OrderStatus::Preparing.as_str()))
            .await?,
        occupied_tables: state.tables().count_occupied().await?,
        available_couriers: state.couriers().count_available().await?,
    }))
}

/// GET /api/stats/monthly?year=&month= - defaults to the current month
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<PeriodStats>> {
    let now = Utc::now();
    let year = query.year.unwrap_or(now.year());
    let month = query.month.unwrap_or(now.month());
    let (start, end) =
        month_bounds_millis(year, month).ok_or_else(|| invalid_period(year, Some(month)))?;

    let orders = state.orders().find_created_between(start, end).await?;
    Ok(Json(period_stats(year, Some(month), &orders)))
}

/// GET /api/stats/yearly?year= - defaults to the current year
pub async fn yearly(
    State(state): State<ServerState>,
    Query(query): Query<YearlyQuery>,
) -> AppResult<Json<PeriodStats>> {
    let year = query.year.unwrap_or(Utc::now().year());
    let (start, end) = year_bounds_millis(year).ok_or_else(|| invalid_period(year, None))?;

    let orders = state.orders().find_created_between(start, end).await?;
    Ok(Json(period_stats(year, None, &orders)))
}

/// GET /api/stats/couriers - delivered orders per courier
pub async fn couriers(State(state): State<ServerState>) -> AppResult<Json<Vec<CourierStats>>> {
    let delivered = state
        .orders()
        .find_all(Some(OrderStatus::Delivered), None)
        .await?;
    Ok(Json(courier_stats(&delivered)))
}
