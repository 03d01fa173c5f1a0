//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the JSON error body shared by every HTTP-facing crate.

use serde::Serialize;

use super::app_error::AppError;
use super::kind::ErrorKind;

/// Client-facing message for every 5xx response
pub const MASKED_MESSAGE: &str = "Internal server error";

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// PostgreSQL `unique_violation`
#[cfg(feature = "sqlx")]
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// True when the error is a PostgreSQL unique constraint violation
#[cfg(feature = "sqlx")]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.as_ref() == PG_UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Constraint and data errors the client caused become 4xx; anything else
/// (outages, pool exhaustion, privileges, missing rows) is a 500.
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                // Class 23: Integrity Constraint Violation
                Some("23000") => AppError::conflict("Integrity constraint violation"),
                Some("23502") => AppError::bad_request("Required field is null"),
                Some(PG_UNIQUE_VIOLATION) => AppError::conflict("Duplicate key value"),
                Some("23514") => AppError::bad_request("Check constraint violation"),
                // Class 22: Data Exception (e.g. numeric overflow on price)
                Some("22003") => AppError::bad_request("Numeric value out of range"),
                Some("22001") => AppError::bad_request("Value too long for column"),
                _ => AppError::internal("Database error"),
            },
            sqlx::Error::PoolTimedOut => AppError::internal("Database connection pool exhausted"),
            sqlx::Error::Io(_) => AppError::internal("Database connection error"),
            sqlx::Error::Protocol(_) => AppError::internal("Database protocol error"),
            sqlx::Error::Tls(_) => AppError::internal("Database TLS error"),
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

/// JSON body of every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub status: u16,
    pub title: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// Raw failure detail; only filled in outside production
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Attached to the extensions of every 5xx response built from an
/// [`AppError`], so an outer layer can decide whether to expose `detail`.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub body: ErrorBody,
    pub detail: String,
}

impl AppError {
    /// Client-facing body. Server errors never carry their own message here.
    pub fn to_body(&self) -> ErrorBody {
        let message = if self.is_server_error() {
            MASKED_MESSAGE.to_string()
        } else {
            self.message().to_string()
        };

        ErrorBody {
            success: false,
            status: self.status_code(),
            title: self.kind().as_str(),
            message,
            details: self.details().to_vec(),
            error: None,
        }
    }
}

impl ErrorBody {
    /// Body for a failure that never produced an [`AppError`] (e.g. a panic)
    pub fn masked() -> Self {
        ErrorBody {
            success: false,
            status: ErrorKind::InternalServerError.status_code(),
            title: ErrorKind::InternalServerError.as_str(),
            message: MASKED_MESSAGE.to_string(),
            details: Vec::new(),
            error: None,
        }
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = self.to_body();

        if self.is_server_error() {
            let report = ErrorReport {
                body: body.clone(),
                detail: self.detail(),
            };
            let mut response = (status, Json(body)).into_response();
            response.extensions_mut().insert(report);
            return response;
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_body_is_masked() {
        let err = AppError::internal("connection reset by peer");
        let body = err.to_body();
        assert_eq!(body.status, 500);
        assert_eq!(body.message, MASKED_MESSAGE);
        assert!(body.error.is_none());
    }

    #[test]
    fn test_client_error_body_keeps_message_and_details() {
        let err = AppError::bad_request("Validation error")
            .with_details(vec!["\"size\" is required".to_string()]);
        let json = serde_json::to_value(err.to_body()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], 400);
        assert_eq!(json["message"], "Validation error");
        assert_eq!(json["details"][0], "\"size\" is required");
        assert!(json.get("error").is_none());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_store_failures_are_internal() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        for err in [
            sqlx::Error::PoolTimedOut,
            sqlx::Error::Io(refused),
            sqlx::Error::RowNotFound,
            sqlx::Error::PoolClosed,
        ] {
            assert!(!is_unique_violation(&err));
            let app_err: AppError = err.into();
            assert_eq!(app_err.kind(), ErrorKind::InternalServerError);
        }
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_attaches_report_for_server_errors() {
        use axum::response::IntoResponse;

        let response = AppError::internal("boom").into_response();
        assert_eq!(response.status(), 500);
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert_eq!(report.detail, "boom");

        let response = AppError::not_found("Plot not found").into_response();
        assert_eq!(response.status(), 404);
        assert!(response.extensions().get::<ErrorReport>().is_none());
    }
}
