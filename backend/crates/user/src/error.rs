//! User Error Types
//!
//! Module-level failures, mapped onto the unified `kernel::error::AppError`.

use axum::response::{IntoResponse, Response};
use kernel::error::{
    api_error::ApiError, app_error::AppError, validation::ValidationError,
};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// User-specific result type alias
pub type UserResult<T> = Result<T, UserError>;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("The email has already been taken.")]
    EmailTaken,

    #[error("User not found")]
    NotFound,

    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UserError {
    pub const EMAIL_TAKEN: &'static str = "EMAIL_TAKEN";
    pub const USER_NOT_FOUND: &'static str = "USER_NOT_FOUND";
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        let message = err.to_string();
        match err {
            UserError::EmailTaken => ApiError::conflict(message)
                .with_code(UserError::EMAIL_TAKEN)
                .into(),
            UserError::NotFound => ApiError::not_found(message)
                .with_code(UserError::USER_NOT_FOUND)
                .into(),
            UserError::PasswordPolicy(e) => ValidationError::field("password", e.to_string()).into(),
            UserError::PasswordHash(e) => ApiError::internal("Password hashing failed")
                .with_source(e)
                .into(),
            UserError::Database(e) => AppError::from(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_taken_maps_to_conflict() {
        let err = AppError::from(UserError::EmailTaken);
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.code(), "EMAIL_TAKEN");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::from(UserError::NotFound);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.code(), "USER_NOT_FOUND");
        assert_eq!(err.message(), "User not found");
    }

    #[test]
    fn test_password_policy_is_field_error() {
        let err = AppError::from(UserError::PasswordPolicy(PasswordPolicyError::TooShort {
            min: 8,
            actual: 3,
        }));
        match err {
            AppError::Validation(v) => assert_eq!(
                v.errors().get("password").unwrap(),
                &["The password must be at least 8 characters.".to_string()]
            ),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
