//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{AvailabilityUpdate, Product, ProductCreate};
use shared::util::{new_id, now_millis};
use std::collections::HashSet;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode, validate_payload};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default = "default_true")]
    pub available_only: bool,
}

fn default_true() -> bool {
    true
}

fn not_found(id: &str) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
}

/// GET /api/products - available products of active categories by default
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Product>>> {
    let mut products = state
        .products()
        .find_all(params.category_id.as_deref(), params.available_only)
        .await?;

    if params.available_only {
        let active: HashSet<String> = state
            .categories()
            .find_all(true)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        products.retain(|p| active.contains(&p.category_id));
    }

    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_payload(&payload)?;
    if payload.price < Decimal::ZERO {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice)
            .with_detail("price", payload.price.to_string()));
    }
    if state
        .categories()
        .find_by_id(&payload.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound)
            .with_detail("category_id", payload.category_id));
    }

    let product = Product {
        id: new_id(),
        name: payload.name,
        description: payload.description,
        price: payload.price,
        category_id: payload.category_id,
        is_available: true,
        image_url: payload.image_url,
        created_at: now_millis(),
    };
    state.products().insert(&product).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    Ok(Json(product))
}

/// PUT /api/products/{id}/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityUpdate>,
) -> AppResult<Json<Product>> {
    let repo = state.products();
    if repo.find_by_id(&id).await?.is_none() {
        return Err(not_found(&id));
    }
    let product = repo.set_availability(&id, payload.is_available).await?;
    Ok(Json(product))
}
