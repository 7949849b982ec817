//! Application Error - Unified error type for the application
//!
//! Defines the [`AppError`] tagged union and the [`AppResult<T>`] alias.
//! Every failure a handler can surface is one of three variants, and a single
//! renderer decides how each variant reaches the client.

use std::borrow::Cow;
use std::error::Error;

use serde::Serialize;
use serde_json::Value;

use super::api_error::ApiError;
use super::kind::ErrorKind;
use super::validation::{FieldErrors, ValidationError};

/// Application error
///
/// ## Variants
/// * `Api` - ad-hoc failure with caller-defined code, status and details
/// * `Unauthorized` - authentication failure, always 401
/// * `Validation` - malformed input, always 422 with field-level details
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::unauthorized();
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.code(), "UNAUTHORIZED");
/// assert_eq!(err.message(), "Unauthorized access");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result alias used across modules
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::{AppError, AppResult};
/// use kernel::error::api_error::ApiError;
///
/// fn find_user(id: u32) -> AppResult<String> {
///     if id == 0 {
///         return Err(ApiError::not_found("User not found").into());
///     }
///     Ok("Alice".to_string())
/// }
/// ```
pub type AppResult<T> = Result<T, AppError>;

/// The `error` object of the error envelope
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Serialized as `null` when absent, never omitted
    pub details: Option<Value>,
}

impl AppError {
    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 401 with the default message
    #[inline]
    pub fn unauthorized() -> Self {
        Self::Unauthorized(UnauthorizedError::default())
    }

    /// 401 with a custom message
    #[inline]
    pub fn unauthorized_with(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized(UnauthorizedError::new(message))
    }

    /// 422 from a set of field errors
    #[inline]
    pub fn validation(errors: FieldErrors) -> Self {
        Self::Validation(ValidationError::new(errors))
    }

    /// 400 `API_ERROR`
    #[inline]
    pub fn api(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Api(ApiError::new(message))
    }

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Api(ApiError::bad_request(message))
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Api(ApiError::not_found(message))
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Api(ApiError::internal(message))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Machine-readable `error.code`
    pub fn code(&self) -> &str {
        match self {
            AppError::Api(err) => err.code(),
            AppError::Unauthorized(_) => UnauthorizedError::CODE,
            AppError::Validation(_) => ValidationError::CODE,
        }
    }

    /// Human-readable `error.message`
    pub fn message(&self) -> &str {
        match self {
            AppError::Api(err) => err.message(),
            AppError::Unauthorized(err) => err.message(),
            AppError::Validation(_) => ValidationError::MESSAGE,
        }
    }

    /// Structured `error.details`
    pub fn details(&self) -> Option<Value> {
        match self {
            AppError::Api(err) => err.details().cloned(),
            AppError::Unauthorized(_) => None,
            AppError::Validation(err) => serde_json::to_value(err.errors()).ok(),
        }
    }

    /// HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Api(err) => err.status_code(),
            AppError::Unauthorized(_) => UnauthorizedError::STATUS,
            AppError::Validation(_) => ValidationError::STATUS,
        }
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// The `error` object for the envelope
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.message().to_string(),
            details: self.details(),
        }
    }

    /// Log with a level matching the severity
    pub fn log(&self) {
        if self.is_server_error() {
            tracing::error!(
                code = %self.code(),
                status = self.status_code(),
                error = %self,
                source = ?self.source(),
                "Server error"
            );
        } else {
            tracing::debug!(
                code = %self.code(),
                status = self.status_code(),
                error = %self,
                "Client error"
            );
        }
    }
}

// ============================================================================
// Unauthorized
// ============================================================================

/// Authentication failure
///
/// Renders as `{code: "UNAUTHORIZED", message, details: null}` at 401 for
/// API clients, and as a redirect to the login route for browsers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UnauthorizedError {
    message: Cow<'static, str>,
}

impl UnauthorizedError {
    pub const CODE: &'static str = "UNAUTHORIZED";
    pub const DEFAULT_MESSAGE: &'static str = "Unauthorized access";
    pub const STATUS: u16 = 401;

    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for UnauthorizedError {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// Converts `Result<T, E>` into `AppResult<T>`
pub trait ResultExt<T, E> {
    /// Wrap the error as an [`ApiError`] of the given kind and message
    fn map_api_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_api_err(self, kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| ApiError::from_kind(kind, message).with_source(e).into())
    }
}

/// Converts `Option<T>` into `AppResult<T>`
pub trait OptionExt<T> {
    /// `None` becomes the given [`ApiError`]
    fn ok_or_api_err(self, err: ApiError) -> AppResult<T>;

    /// `None` becomes a 404 `NOT_FOUND`
    fn ok_or_not_found(self, message: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_api_err(self, err: ApiError) -> AppResult<T> {
        self.ok_or_else(|| err.into())
    }

    fn ok_or_not_found(self, message: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| ApiError::not_found(message).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unauthorized_defaults() {
        let err = AppError::unauthorized();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.code(), "UNAUTHORIZED");
        assert_eq!(err.message(), "Unauthorized access");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_unauthorized_custom_message() {
        let err = AppError::unauthorized_with("Invalid credentials");
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_validation_body() {
        let err = AppError::validation(FieldErrors::single("email", "required"));
        assert_eq!(
            err.to_body(),
            ErrorBody {
                code: "VALIDATION_ERROR".to_string(),
                message: "Validation failed".to_string(),
                details: Some(json!({ "email": ["required"] })),
            }
        );
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_api_body_keeps_details() {
        let err: AppError = ApiError::new("Boom")
            .with_details(json!({ "retry": false }))
            .into();
        let body = err.to_body();
        assert_eq!(body.code, "API_ERROR");
        assert_eq!(body.details, Some(json!({ "retry": false })));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_error_body_serializes_null_details() {
        let body = AppError::unauthorized().to_body();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "code": "UNAUTHORIZED", "message": "Unauthorized access", "details": null })
        );
    }

    #[test]
    fn test_source_is_reachable_through_variant() {
        let io_err = std::io::Error::other("disk on fire");
        let err: AppError = ApiError::internal("Failed").with_source(io_err).into();
        assert!(err.source().is_some());
        assert!(err.is_server_error());
    }

    #[test]
    fn test_result_ext() {
        let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "not found",
        ));
        let err = result
            .map_api_err(ErrorKind::NotFound, "Resource not found")
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let err = none.ok_or_not_found("Item not found").unwrap_err();
        assert_eq!(err.status_code(), 404);

        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_not_found("Item not found").unwrap(), 42);

        let none: Option<i32> = None;
        let err = none
            .ok_or_api_err(ApiError::new("Gone").with_code("GONE").with_status(410))
            .unwrap_err();
        assert_eq!(err.code(), "GONE");
    }
}
