//! The `web` Middleware Group
//!
//! Every module router is served through this stack (outermost first):
//! 1. `TraceLayer` request tracing
//! 2. [`log_http_status`]: 4xx/5xx status logging
//! 3. [`negotiate_errors`]: re-renders errors for clients that do not
//!    expect JSON
//!
//! Handlers always fail with `AppError`, whose `IntoResponse` renders the
//! JSON envelope and leaves a [`RenderedError`] in the response extensions.
//! [`render_error`] is the one place that decides how each variant looks
//! for each response format.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use kernel::response::{RenderedError, json_error_response};
use platform::cookie::{
    CookieConfig, FLASH_ERRORS_COOKIE, INTENDED_URL_COOKIE, encode_flash, encode_intended_url,
};
use platform::negotiate::ResponseFormat;
use tower_http::trace::TraceLayer;

/// Request headers [`ResponseFormat::negotiate`] reads
const NEGOTIATED_HEADERS: &str = "Accept, X-Requested-With, X-PJAX";

/// Process-wide settings the web group needs
#[derive(Debug, Clone, Default)]
pub struct WebConfig {
    /// URL of the named `login` route, if a module registered one
    pub login_url: Option<String>,
    /// Secure attribute for flash and intended-URL cookies
    pub cookie_secure: bool,
}

/// Per-request inputs to [`render_error`]
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub login_url: Option<String>,
    /// Path and query of the failed request
    pub intended_uri: String,
    /// Where "back" is: the `Referer`, or "/"
    pub back_url: String,
    pub cookie_secure: bool,
}

impl RenderContext {
    pub fn from_request(req: &Request, config: &WebConfig) -> Self {
        let intended_uri = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        let back_url = req
            .headers()
            .get(header::REFERER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or("/")
            .to_string();

        Self {
            login_url: config.login_url.clone(),
            intended_uri,
            back_url,
            cookie_secure: config.cookie_secure,
        }
    }
}

/// Wrap a router in the `web` middleware group
pub fn web_group(router: Router, config: WebConfig) -> Router {
    router
        .layer(middleware::from_fn_with_state(
            Arc::new(config),
            negotiate_errors,
        ))
        .layer(middleware::from_fn(log_http_status))
        .layer(TraceLayer::new_for_http())
}

/// Render an error for the negotiated format
///
/// | variant      | JSON          | HTML                                    |
/// |--------------|---------------|-----------------------------------------|
/// | Api          | envelope      | envelope                                |
/// | Unauthorized | envelope, 401 | 302 to login, remembers intended URL    |
/// | Validation   | envelope, 422 | 302 back, flashes field errors          |
pub fn render_error(err: &AppError, format: ResponseFormat, ctx: &RenderContext) -> Response {
    match (format, err) {
        (ResponseFormat::Json, _) | (ResponseFormat::Html, AppError::Api(_)) => {
            json_error_response(err)
        }
        (ResponseFormat::Html, AppError::Unauthorized(_)) => match &ctx.login_url {
            Some(login_url) => {
                let intended = CookieConfig::short_lived(INTENDED_URL_COOKIE, ctx.cookie_secure)
                    .set_cookie_header(&encode_intended_url(&ctx.intended_uri));
                redirect(login_url, intended)
            }
            None => {
                tracing::error!("No `login` route is registered; rendering 401 as JSON");
                json_error_response(err)
            }
        },
        (ResponseFormat::Html, AppError::Validation(validation)) => {
            let flash = match encode_flash(validation.errors()) {
                Ok(value) => CookieConfig::short_lived(FLASH_ERRORS_COOKIE, ctx.cookie_secure)
                    .set_cookie_header(&value),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to encode flashed errors");
                    None
                }
            };
            redirect(&ctx.back_url, flash)
        }
    }
}

/// 302 Found with an optional cookie
fn redirect(location: &str, cookie: Option<HeaderValue>) -> Response {
    let location = HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));

    let mut response = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

/// Re-render `AppError` responses for non-JSON clients
///
/// Every error response, re-rendered or not, varies on the negotiated
/// request headers.
pub async fn negotiate_errors(
    State(config): State<Arc<WebConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let format = ResponseFormat::negotiate(req.headers());
    let ctx = RenderContext::from_request(&req, &config);
    let response = next.run(req).await;

    let Some(rendered) = response.extensions().get::<RenderedError>().cloned() else {
        return response;
    };

    let mut response = match format {
        ResponseFormat::Json => response,
        ResponseFormat::Html => render_error(rendered.error(), format, &ctx),
    };
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static(NEGOTIATED_HEADERS));
    response
}

/// HTTP status logging: 4xx at warn, 5xx at error
pub async fn log_http_status(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use http_body_util::BodyExt;
    use kernel::error::api_error::ApiError;
    use kernel::error::validation::FieldErrors;
    use platform::cookie::{decode_flash, decode_intended_url};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn unauthorized() -> Result<(), AppError> {
        Err(AppError::unauthorized())
    }

    async fn invalid() -> Result<(), AppError> {
        Err(AppError::validation(FieldErrors::single(
            "email",
            "The email field is required.",
        )))
    }

    async fn conflict() -> Result<(), AppError> {
        Err(ApiError::conflict("Already exists").with_code("EXISTS").into())
    }

    fn app(login_url: Option<&str>) -> Router {
        let router = Router::new()
            .route("/private", get(unauthorized))
            .route("/form", get(invalid))
            .route("/conflict", get(conflict));
        web_group(
            router,
            WebConfig {
                login_url: login_url.map(str::to_string),
                cookie_secure: false,
            },
        )
    }

    fn browser(uri: &str) -> axum::http::request::Builder {
        HttpRequest::builder()
            .uri(uri)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8")
    }

    fn json_client(uri: &str) -> axum::http::request::Builder {
        HttpRequest::builder()
            .uri(uri)
            .header(header::ACCEPT, "application/json")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn cookie_value(response: &Response, name: &str) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|v| {
                let pair = v.split(';').next()?;
                let (key, value) = pair.split_once('=')?;
                (key == name).then(|| value.to_string())
            })
    }

    #[tokio::test]
    async fn test_unauthorized_json() {
        let response = app(Some("/login"))
            .oneshot(json_client("/private").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": {
                    "code": "UNAUTHORIZED",
                    "message": "Unauthorized access",
                    "details": null
                }
            })
        );
    }

    #[tokio::test]
    async fn test_unauthorized_html_redirects_to_login() {
        let response = app(Some("/login"))
            .oneshot(browser("/private?tab=2").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let intended = cookie_value(&response, INTENDED_URL_COOKIE).unwrap();
        assert_eq!(
            decode_intended_url(&intended),
            Some("/private?tab=2".to_string())
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_html_without_login_route_falls_back_to_json() {
        let response = app(None)
            .oneshot(browser("/private").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_validation_json() {
        let response = app(Some("/login"))
            .oneshot(json_client("/form").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": {
                    "code": "VALIDATION_ERROR",
                    "message": "Validation failed",
                    "details": { "email": ["The email field is required."] }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_validation_html_redirects_back_with_flash() {
        let response = app(Some("/login"))
            .oneshot(
                browser("/form")
                    .header(header::REFERER, "/register")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/register");

        let flash = cookie_value(&response, FLASH_ERRORS_COOKIE).unwrap();
        let errors: FieldErrors = decode_flash(&flash).unwrap();
        assert_eq!(
            errors.get("email"),
            Some(&["The email field is required.".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_validation_html_without_referer_goes_home() {
        let response = app(Some("/login"))
            .oneshot(browser("/form").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_api_error_is_json_for_every_client() {
        for request in [json_client("/conflict"), browser("/conflict")] {
            let response = app(Some("/login"))
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::CONFLICT);
            assert_eq!(
                body_json(response).await,
                json!({
                    "success": false,
                    "error": { "code": "EXISTS", "message": "Already exists", "details": null }
                })
            );
        }
    }

    #[tokio::test]
    async fn test_error_responses_vary_on_negotiated_headers() {
        for request in [json_client("/private"), browser("/private"), browser("/conflict")] {
            let response = app(Some("/login"))
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.headers()[header::VARY], NEGOTIATED_HEADERS);
        }
    }

    #[tokio::test]
    async fn test_success_responses_are_untouched() {
        let router = web_group(
            Router::new().route("/ok", get(|| async { "ok" })),
            WebConfig::default(),
        );
        let response = router
            .oneshot(browser("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::VARY).is_none());
    }

    #[tokio::test]
    async fn test_ajax_wildcard_is_json() {
        let response = app(Some("/login"))
            .oneshot(
                HttpRequest::builder()
                    .uri("/private")
                    .header("x-requested-with", "XMLHttpRequest")
                    .header(header::ACCEPT, "*/*")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
