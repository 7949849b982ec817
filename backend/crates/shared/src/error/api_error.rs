//! Generic API error
//!
//! [`ApiError`] carries an arbitrary caller-defined code, status and details.
//! It is the variant to reach for when a handler needs to signal an ad-hoc
//! failure that is neither an authentication problem nor field validation.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde_json::Value;

use super::kind::ErrorKind;

/// Generic API error
///
/// ## Fields
/// * `message` - human-readable message (`error.message`)
/// * `code` - machine-readable identifier (`error.code`), default `API_ERROR`
/// * `details` - structured context (`error.details`), default `null`
/// * `status` - HTTP status, default 400
/// * `source` - wrapped cause, never serialized
///
/// ## Examples
/// ```rust
/// use kernel::error::api_error::ApiError;
///
/// let err = ApiError::new("Quota exceeded")
///     .with_code("QUOTA_EXCEEDED")
///     .with_status(429)
///     .with_details(serde_json::json!({ "limit": 100 }));
///
/// assert_eq!(err.code(), "QUOTA_EXCEEDED");
/// assert_eq!(err.status_code(), 429);
/// ```
pub struct ApiError {
    message: Cow<'static, str>,
    code: Cow<'static, str>,
    details: Option<Value>,
    status: u16,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl ApiError {
    pub const DEFAULT_CODE: &'static str = "API_ERROR";
    pub const DEFAULT_STATUS: u16 = 400;

    // ========================================================================
    // Constructors
    // ========================================================================

    /// New error with the default code (`API_ERROR`) and status (400)
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            code: Cow::Borrowed(Self::DEFAULT_CODE),
            details: None,
            status: Self::DEFAULT_STATUS,
            source: None,
        }
    }

    /// New error whose status and code come from an [`ErrorKind`]
    #[inline]
    pub fn from_kind(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(message)
            .with_code(kind.code())
            .with_status(kind.status_code())
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// 400 Bad Request
    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::BadRequest, message)
    }

    /// 403 Forbidden
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::Forbidden, message)
    }

    /// 404 Not Found
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::NotFound, message)
    }

    /// 409 Conflict
    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::Conflict, message)
    }

    /// 429 Too Many Requests
    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::TooManyRequests, message)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::InternalServerError, message)
    }

    /// 503 Service Unavailable
    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_kind(ErrorKind::ServiceUnavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    #[inline]
    pub fn with_code(mut self, code: impl Into<Cow<'static, str>>) -> Self {
        self.code = code.into();
        self
    }

    #[inline]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    #[inline]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Wrap the underlying cause (kept for logging, never rendered)
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::api_error::ApiError;
    ///
    /// fn read_manifest() -> Result<String, ApiError> {
    ///     std::fs::read_to_string("manifest.toml")
    ///         .map_err(|e| ApiError::internal("Failed to read manifest").with_source(e))
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("ApiError");
        builder.field("code", &self.code);
        builder.field("status", &self.status);
        builder.field("message", &self.message);
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
