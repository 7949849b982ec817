//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`],
//! and the axum [`IntoResponse`](axum::response::IntoResponse) rendering.

use super::api_error::ApiError;
use super::app_error::AppError;
use super::validation::ValidationError;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let api = match err.kind() {
            std::io::ErrorKind::NotFound => ApiError::not_found("Resource not found"),
            std::io::ErrorKind::PermissionDenied => ApiError::forbidden("Permission denied"),
            _ => ApiError::internal("I/O operation failed"),
        };
        api.with_source(err).into()
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        ApiError::bad_request("Invalid integer format")
            .with_source(err)
            .into()
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        ApiError::bad_request("Invalid identifier format")
            .with_source(err)
            .into()
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            ApiError::bad_request(format!("JSON parse error: {}", err))
                .with_code("INVALID_JSON")
                .with_source(err)
                .into()
        } else {
            ApiError::internal("JSON serialization error")
                .with_source(err)
                .into()
        }
    }
}

// ============================================================================
// validator conversions
// ============================================================================

impl From<validator::ValidationErrors> for AppError {
    fn from(errs: validator::ValidationErrors) -> Self {
        AppError::Validation(ValidationError::from(errs))
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let api = match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut => {
                ApiError::service_unavailable("Database connection pool exhausted")
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    Some("23502") => ApiError::bad_request("Required field is null"),
                    Some("23503") => ApiError::conflict("Foreign key violation"),
                    Some("23505") => ApiError::conflict("Duplicate key value"),
                    Some("23514") => ApiError::bad_request("Check constraint violation"),
                    Some("53000" | "53100" | "53200" | "53300") => {
                        ApiError::service_unavailable("Database resource exhausted")
                    }
                    _ => ApiError::internal("Database error"),
                }
            }
            sqlx::Error::Io(_) => ApiError::service_unavailable("Database connection error"),
            _ => ApiError::internal("Database error"),
        };
        api.with_source(err).into()
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        let message = rejection.body_text();
        let status = rejection.status().as_u16();
        ApiError::new(message)
            .with_code("INVALID_JSON")
            .with_status(status)
            .with_source(rejection)
            .into()
    }
}

/// Renders the JSON error envelope and attaches the error itself to the
/// response extensions, so an outer layer can re-render it for clients
/// that do not expect JSON.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();
        let mut response = crate::response::json_error_response(&self);
        response
            .extensions_mut()
            .insert(crate::response::RenderedError::new(self));
        response
    }
}
