//! Error bridging
//!
//! Server-side error types converge on [`AppError`] here, so handlers can
//! use `?` on store and engine results alike.
//!
//! ```ignore
//! let table = repo.find_by_id(&id).await?
//!     .ok_or_else(|| AppError::not_found(format!("Table {}", id)))?;
//! Ok(Json(table))
//! ```

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use crate::store::StoreError;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                AppError::not_found(format!("{}/{}", collection, id))
            }
            StoreError::Duplicate {
                collection,
                field,
                value,
            } => {
                let code = match (collection, field) {
                    ("users", "username") => ErrorCode::UsernameExists,
                    ("tables", "number") => ErrorCode::TableNumberExists,
                    _ => ErrorCode::AlreadyExists,
                };
                AppError::new(code)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            StoreError::PreconditionFailed { collection, id } => {
                AppError::conflict(format!("{}/{} was modified concurrently", collection, id))
            }
            StoreError::Timeout(elapsed) => {
                AppError::timeout(format!("Store operation timed out after {:?}", elapsed))
            }
            other => AppError::database(other.to_string()),
        }
    }
}
