//! Store errors

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: &'static str, id: String },

    #[error("Duplicate {field} '{value}' in {collection}")]
    Duplicate {
        collection: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Precondition failed for {collection}/{id}")]
    PreconditionFailed { collection: &'static str, id: String },

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Store task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Transient failures the caller may retry as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
