//! Response Envelope
//!
//! Every JSON body the API emits is one of two shapes:
//!
//! ```text
//! {"success": true,  "data"?: <any>, "message"?: "<string>"}
//! {"success": false, "error": {"code": "<string>", "message": "<string>", "details": <any|null>}}
//! ```
//!
//! `data` and `message` are omitted entirely when absent. `error.details` is
//! always present and is `null` when there is nothing to report.

use serde::{Deserialize, Serialize};

use crate::error::app_error::{AppError, ErrorBody};

/// Success shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            data,
            message,
        }
    }
}

/// Error shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details,
            },
        }
    }
}

impl From<&AppError> for ErrorEnvelope {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            error: err.to_body(),
        }
    }
}

#[cfg(feature = "axum")]
pub use http_response::*;

#[cfg(feature = "axum")]
mod http_response {
    use std::borrow::Cow;
    use std::sync::Arc;

    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use serde::Serialize;
    use serde_json::Value;

    use super::{ErrorEnvelope, SuccessEnvelope};
    use crate::error::api_error::ApiError;
    use crate::error::app_error::AppError;

    /// Success envelope at `status`
    ///
    /// `data` is left out of the body when it is `None` or serializes to
    /// `null`; `message` is left out when it is `None`.
    pub fn success_response<T: Serialize>(
        data: Option<T>,
        message: Option<String>,
        status: StatusCode,
    ) -> Response {
        let data = match data.map(serde_json::to_value).transpose() {
            Ok(data) => data.filter(|value| !value.is_null()),
            Err(e) => {
                let err = ApiError::internal("Failed to serialize response").with_source(e);
                return AppError::from(err).into_response();
            }
        };

        (status, Json(SuccessEnvelope::<Value>::new(data, message))).into_response()
    }

    /// Error envelope at `status`; all three `error` keys are always present
    pub fn error_response(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<Value>,
        status: StatusCode,
    ) -> Response {
        (status, Json(ErrorEnvelope::new(code, message, details))).into_response()
    }

    /// JSON rendering of an [`AppError`] at its own status
    pub fn json_error_response(err: &AppError) -> Response {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(err))).into_response()
    }

    /// The error a response was rendered from
    ///
    /// Inserted into response extensions by `AppError::into_response`.
    #[derive(Debug, Clone)]
    pub struct RenderedError(Arc<AppError>);

    impl RenderedError {
        pub fn new(err: AppError) -> Self {
            Self(Arc::new(err))
        }

        pub fn error(&self) -> &AppError {
            &self.0
        }
    }

    /// Builder for success responses
    ///
    /// ## Examples
    /// ```rust
    /// use axum::http::StatusCode;
    /// use kernel::response::ApiResponse;
    ///
    /// // {"success":true}
    /// let _ = ApiResponse::success();
    ///
    /// // 201 {"success":true,"data":{"id":1},"message":"Created"}
    /// let _ = ApiResponse::created(serde_json::json!({ "id": 1 })).message("Created");
    ///
    /// // 202 {"success":true,"message":"Queued"}
    /// let _ = ApiResponse::success().message("Queued").status(StatusCode::ACCEPTED);
    /// ```
    #[derive(Debug, Clone)]
    pub struct ApiResponse<T = ()> {
        status: StatusCode,
        data: Option<T>,
        message: Option<Cow<'static, str>>,
    }

    impl ApiResponse<()> {
        /// `{"success": true}` at 200
        pub fn success() -> Self {
            Self {
                status: StatusCode::OK,
                data: None,
                message: None,
            }
        }
    }

    impl<T: Serialize> ApiResponse<T> {
        /// Data at 200
        pub fn ok(data: T) -> Self {
            Self {
                status: StatusCode::OK,
                data: Some(data),
                message: None,
            }
        }

        /// Data at 201
        pub fn created(data: T) -> Self {
            Self {
                status: StatusCode::CREATED,
                data: Some(data),
                message: None,
            }
        }

        pub fn data<U: Serialize>(self, data: U) -> ApiResponse<U> {
            ApiResponse {
                status: self.status,
                data: Some(data),
                message: self.message,
            }
        }

        pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
            self.message = Some(message.into());
            self
        }

        pub fn status(mut self, status: StatusCode) -> Self {
            self.status = status;
            self
        }
    }

    impl<T: Serialize> IntoResponse for ApiResponse<T> {
        fn into_response(self) -> Response {
            success_response(
                self.data,
                self.message.map(Cow::into_owned),
                self.status,
            )
        }
    }
}
