//! Plot Error Types
//!
//! Plot-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Plot-specific result type alias
pub type PlotResult<T> = Result<T, PlotError>;

/// Plot-specific error variants
#[derive(Debug, Error)]
pub enum PlotError {
    /// Payload or query failed validation; one message per field problem
    #[error("Validation error")]
    Validation(Vec<String>),

    /// Update body carried no fields
    #[error("No fields to update")]
    NothingToUpdate,

    /// No plot with the requested id
    #[error("Plot not found")]
    NotFound,

    /// Plot number already used by another record
    #[error("Plot number already exists")]
    PlotNumberTaken,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlotError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::Validation(_) | PlotError::NothingToUpdate => ErrorKind::BadRequest,
            PlotError::NotFound => ErrorKind::NotFound,
            PlotError::PlotNumberTaken => ErrorKind::Conflict,
            PlotError::Database(_) | PlotError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PlotError::Database(e) => {
                tracing::error!(error = %e, "Plots database error");
            }
            PlotError::Internal(msg) => {
                tracing::error!(message = %msg, "Plots internal error");
            }
            PlotError::PlotNumberTaken => {
                tracing::warn!("Duplicate plot number rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Plots error");
            }
        }
    }
}

impl From<PlotError> for AppError {
    fn from(err: PlotError) -> Self {
        match err {
            PlotError::Validation(details) => {
                AppError::bad_request("Validation error").with_details(details)
            }
            PlotError::Database(e) => AppError::from(e),
            PlotError::Internal(msg) => AppError::internal(msg),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for PlotError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
