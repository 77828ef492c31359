//! Courier administration API (admin)

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/couriers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/pending", get(handler::list_pending))
        .route("/{id}", delete(handler::delete))
        .route("/{id}/approve", put(handler::approve))
        .route("/{id}/availability", put(handler::set_availability))
        .layer(middleware::from_fn(require_admin))
}
