//! Export API (admin)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Number of orders removed by daily-and-clear
pub const DELETED_ORDERS_HEADER: &str = "x-deleted-orders";

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/export", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::export_orders))
        .route("/daily-and-clear", post(handler::daily_and_clear))
        .layer(middleware::from_fn(require_admin))
}
