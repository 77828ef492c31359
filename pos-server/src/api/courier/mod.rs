//! Courier self-service API
//!
//! Requires an approved courier token; the caller's courier id comes from
//! the token, never from the request.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_courier;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/courier", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/packages", get(handler::packages))
        .route("/my-orders", get(handler::my_orders))
        .route("/my-stats", get(handler::my_stats))
        .route("/orders/{id}/take", put(handler::take))
        .route("/orders/{id}/deliver", put(handler::deliver))
        .route("/orders/{id}/cancel", put(handler::cancel))
        .layer(middleware::from_fn(require_courier))
}
