//! Auth Error Types
//!
//! Auth-specific variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use thiserror::Error;
use user::UserError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session cookie missing, forged, expired or revoked
    #[error("Session not found or expired")]
    SessionInvalid,

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    fn log(&self) {
        match self {
            AuthError::InvalidCredentials => tracing::warn!("Invalid login attempt"),
            AuthError::SessionInvalid => tracing::debug!("Rejected invalid session"),
            _ => {}
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::unauthorized_with("Invalid credentials"),
            AuthError::SessionInvalid => AppError::unauthorized(),
            AuthError::User(e) => e.into(),
            AuthError::Database(e) => e.into(),
            AuthError::Internal(msg) => AppError::internal(msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_and_sessions_are_unauthorized() {
        let err = AppError::from(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.message(), "Invalid credentials");

        let err = AppError::from(AuthError::SessionInvalid);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Unauthorized access");
    }

    #[test]
    fn test_internal_is_server_error() {
        let err = AppError::from(AuthError::Internal("boom".to_string()));
        assert!(err.is_server_error());
    }
}
