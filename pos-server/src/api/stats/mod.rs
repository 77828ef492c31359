//! Statistics API (admin)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/monthly", get(handler::monthly))
        .route("/yearly", get(handler::yearly))
        .route("/couriers", get(handler::couriers))
        .layer(middleware::from_fn(require_admin))
}
