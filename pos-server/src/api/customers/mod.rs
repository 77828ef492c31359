//! Customer API (admin)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest(
        "/api/customers",
        Router::new()
            .route("/", get(handler::list).post(handler::create))
            .layer(middleware::from_fn(require_admin)),
    )
}
