//! # Store Errors

use thiserror::Error;

use clm_core::ValidationError;
use clm_state::LifecycleError;

/// Errors raised by repository operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed record does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record family ("blueprint", "field", "contract").
        kind: &'static str,
        /// The requested identifier.
        id: String,
    },

    /// An input failed validation before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The record changed between the read and the conditional write.
    #[error("{0}")]
    Conflict(String),

    /// The database rejected or failed a statement.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
