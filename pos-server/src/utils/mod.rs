//! Utilities - shared error types, logging, request validation
//!
//! - [`AppError`] / [`ApiResponse`] come from `shared::error`
//! - [`logger`] sets up `tracing`
//! - [`validation`] turns `validator` failures into `AppError`

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use validation::validate_payload;
