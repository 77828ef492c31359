//! Courier API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Courier, CourierAvailabilityUpdate, CourierCreate};
use shared::util::{new_id, now_millis};

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, validate_payload};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub available_only: bool,
}

async fn load(state: &ServerState, id: &str) -> AppResult<Courier> {
    state
        .couriers()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CourierNotFound).with_detail("courier_id", id))
}

/// GET /api/couriers
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Courier>>> {
    Ok(Json(state.couriers().find_all(params.available_only).await?))
}

/// GET /api/couriers/pending - registrations awaiting approval
pub async fn list_pending(State(state): State<ServerState>) -> AppResult<Json<Vec<Courier>>> {
    Ok(Json(state.couriers().find_pending().await?))
}

/// POST /api/couriers - admin-created couriers start approved and available
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CourierCreate>,
) -> AppResult<Json<Courier>> {
    validate_payload(&payload)?;
    let courier = Courier {
        id: new_id(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone_number: payload.phone_number,
        vehicle_type: payload.vehicle_type,
        vehicle_plate: payload.vehicle_plate,
        is_available: true,
        is_approved: true,
        user_id: None,
        created_at: now_millis(),
    };
    state.couriers().insert(&courier).await?;
    tracing::info!(courier_id = %courier.id, name = %courier.full_name(), "Courier created");
    Ok(Json(courier))
}

/// PUT /api/couriers/{id}/approve - approves the courier and its login
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Courier>> {
    let courier = load(&state, &id).await?;
    if let Some(user_id) = &courier.user_id {
        state.users().set_approved(user_id, true).await?;
    }
    let courier = state.couriers().set_approved(&id, true).await?;
    tracing::info!(courier_id = %id, "Courier approved");
    Ok(Json(courier))
}

/// PUT /api/couriers/{id}/availability - manual override
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CourierAvailabilityUpdate>,
) -> AppResult<Json<Courier>> {
    load(&state, &id).await?;
    let courier = state
        .couriers()
        .set_availability(&id, payload.is_available)
        .await?;
    tracing::warn!(courier_id = %id, is_available = payload.is_available, "Courier availability overridden");
    Ok(Json(courier))
}

/// DELETE /api/couriers/{id} - refused while the courier holds an active order
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let courier = state.engine.delete_courier(&id).await?;
    if let Some(user_id) = &courier.user_id {
        state.users().delete(user_id).await?;
    }
    Ok(Json(ApiResponse::message("Courier deleted")))
}
