//! Customer API Handlers

use axum::{Json, extract::State};
use shared::models::{Customer, CustomerCreate};

use crate::core::ServerState;
use crate::utils::{AppResult, validate_payload};

/// GET /api/customers - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers().find_all().await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_payload(&payload)?;
    let customer = state.customers().create(payload).await?;
    Ok(Json(customer))
}
