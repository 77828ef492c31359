//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, DiningTableCreate, TableStatusUpdate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

/// GET /api/tables - all tables by number
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = state.tables().find_all().await?;
    Ok(Json(tables))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_payload(&payload)?;
    let table = state.tables().create(payload).await?;
    tracing::info!(table_id = %table.id, number = table.number, "Table created");
    Ok(Json(table))
}

/// PUT /api/tables/{id}/status - manual occupancy override
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let repo = state.tables();
    if repo.find_by_id(&id).await?.is_none() {
        return Err(AppError::new(ErrorCode::TableNotFound).with_detail("table_id", id));
    }
    let table = repo.set_occupied(&id, payload.is_occupied).await?;
    tracing::warn!(table_id = %id, is_occupied = payload.is_occupied, "Table occupancy overridden");
    Ok(Json(table))
}
