//! Order API Handlers
//!
//! Every write goes through the [`OrderEngine`](crate::orders::OrderEngine),
//! which keeps table and courier state consistent with the order.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use shared::models::{AssignCourier, Order, OrderCreate, OrderStatus, StatusUpdate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Upper bound on `limit`
const MAX_LIST_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Unknown status strings are a 400, not a body rejection
pub(crate) fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse::<OrderStatus>().map_err(|e| {
        AppError::with_message(ErrorCode::InvalidOrderStatus, e.to_string())
            .with_detail("status", raw)
    })
}

async fn load(state: &ServerState, id: &str) -> AppResult<Order> {
    state
        .orders()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = state.engine.create_order(payload).await?;
    Ok(Json(order))
}

/// GET /api/orders - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Order>>> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let limit = params.limit.map(|l| l.min(MAX_LIST_LIMIT));
    Ok(Json(state.orders().find_all(status, limit).await?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(load(&state, &id).await?))
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let target = parse_status(&payload.status)?;
    let order = state.engine.set_status(&id, target).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/assign-courier
pub async fn assign_courier(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignCourier>,
) -> AppResult<Json<Order>> {
    let order = state.engine.assign_courier(&id, &payload.courier_id).await?;
    Ok(Json(order))
}

/// GET /api/orders/{id}/receipt - PDF attachment
pub async fn receipt(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let order = load(&state, &id).await?;
    let document = state.receipts.render_receipt(&order).map_err(|e| {
        tracing::error!(order_id = %id, error = %e, "Receipt rendering failed");
        AppError::from(e)
    })?;
    Ok(document.into_response())
}
