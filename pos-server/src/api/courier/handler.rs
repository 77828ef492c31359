//! Courier Self-Service Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use shared::models::{CourierSelfStats, Order, OrderStatus};
use shared::util::{day_bounds_millis, now_millis};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

fn courier_id(user: &CurrentUser) -> AppResult<&str> {
    user.courier_id
        .as_deref()
        .ok_or_else(|| AppError::new(ErrorCode::CourierRequired))
}

/// GET /api/courier/packages - open packages, oldest first
pub async fn packages(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders().find_open_packages().await?))
}

/// GET /api/courier/my-orders - newest first
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let courier_id = courier_id(&user)?;
    Ok(Json(state.orders().find_by_courier(courier_id).await?))
}

/// GET /api/courier/my-stats
pub async fn my_stats(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<CourierSelfStats>> {
    let courier_id = courier_id(&user)?;
    let orders = state.orders().find_by_courier(courier_id).await?;
    let (start, end) = day_bounds_millis(now_millis());

    let delivered_today: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .filter(|o| (start..end).contains(&o.updated_at))
        .collect();

    Ok(Json(CourierSelfStats {
        deliveries_today: delivered_today.len() as u64,
        revenue_today: delivered_today
            .iter()
            .map(|o| o.total_amount)
            .sum::<Decimal>(),
        active_orders: orders.iter().filter(|o| o.is_active()).count() as u64,
    }))
}

/// PUT /api/courier/orders/{id}/take - claim an open package
pub async fn take(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let courier_id = courier_id(&user)?;
    let order = state.engine.courier_take_order(courier_id, &id).await?;
    Ok(Json(order))
}

/// PUT /api/courier/orders/{id}/deliver
pub async fn deliver(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let courier_id = courier_id(&user)?;
    let order = state.engine.courier_deliver(courier_id, &id).await?;
    Ok(Json(order))
}

/// PUT /api/courier/orders/{id}/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<Order>> {
    let courier_id = courier_id(&user)?;
    let order = state.engine.courier_cancel(courier_id, &id).await?;
    Ok(Json(order))
}
