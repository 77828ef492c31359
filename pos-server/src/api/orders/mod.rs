//! Order API (admin)
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/orders | POST | place an order |
//! | /api/orders | GET | list, newest first (`status`, `limit`) |
//! | /api/orders/{id} | GET | single order |
//! | /api/orders/{id}/status | PUT | lifecycle transition |
//! | /api/orders/{id}/assign-courier | PUT | attach or replace the courier |
//! | /api/orders/{id}/receipt | GET | PDF receipt |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/assign-courier", put(handler::assign_courier))
        .route("/{id}/receipt", get(handler::receipt))
        .layer(middleware::from_fn(require_admin))
}
