//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness probe (public)
//! - [`auth`] - register, login, current user
//! - [`categories`] / [`products`] - menu catalog
//! - [`tables`] - dining tables
//! - [`customers`] - customer records
//! - [`couriers`] - courier administration
//! - [`orders`] - order lifecycle and receipts
//! - [`courier`] - courier self-service
//! - [`stats`] - dashboard and period statistics
//! - [`export`] - Excel exports

pub mod auth;
pub mod categories;
pub mod courier;
pub mod couriers;
pub mod customers;
pub mod export;
pub mod health;
pub mod orders;
pub mod products;
pub mod stats;
pub mod tables;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Requests still running after `timeout` are answered with 408
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Every route, without middleware or state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(tables::router())
        .merge(customers::router())
        .merge(couriers::router())
        .merge(orders::router())
        .merge(courier::router())
        .merge(stats::router())
        .merge(export::router())
}

/// Fully layered application, shared by the server and the integration tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(state.config.request_timeout()))
        // ========== Application Middleware ==========
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // JWT authentication, injects CurrentUser before routing
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
}
