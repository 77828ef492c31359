//! Category API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Category, CategoryCreate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_true")]
    pub active_only: bool,
}

fn default_true() -> bool {
    true
}

fn not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
}

/// GET /api/categories - active categories unless `active_only=false`
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories().find_all(params.active_only).await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let category = state
        .categories()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_payload(&payload)?;
    let category = state.categories().create(payload).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    Ok(Json(category))
}

/// DELETE /api/categories/{id} - soft delete
pub async fn deactivate(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = state.categories();
    if repo.find_by_id(&id).await?.is_none() {
        return Err(not_found(&id));
    }
    let category = repo.deactivate(&id).await?;
    tracing::info!(category_id = %id, "Category deactivated");
    Ok(Json(category))
}
