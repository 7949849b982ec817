//! HTTP Handlers

use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use kernel::extract::ValidatedJson;
use kernel::response::ApiResponse;
use platform::cookie::{CookieConfig, INTENDED_URL_COOKIE, decode_intended_url, extract_cookie};
use user::UserRepository;

use crate::application::config::AuthConfig;
use crate::application::{SignInInput, SignInUseCase, SignOutUseCase};
use crate::domain::{CurrentUser, SessionRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, LoginResponse};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<U, S>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub users: Arc<U>,
    pub sessions: Arc<S>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Login page
// ============================================================================

/// GET /login
///
/// The named `login` route guests are redirected to.
pub async fn login_page() -> ApiResponse {
    ApiResponse::success().message("Please sign in")
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /login
pub async fn sign_in<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<Response>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.users.clone(),
        state.sessions.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let session_cookie = state
        .config
        .session_cookie()
        .set_cookie_header(&output.session_token)
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".to_string()))?;

    let mut cookies: Vec<(HeaderName, HeaderValue)> = vec![(header::SET_COOKIE, session_cookie)];

    // Consume the intended URL left behind by a guest redirect.
    let redirect_to = match extract_cookie(&headers, INTENDED_URL_COOKIE) {
        Some(value) => {
            cookies.extend(
                CookieConfig::short_lived(INTENDED_URL_COOKIE, state.config.cookie_secure)
                    .delete_cookie_header()
                    .map(|v| (header::SET_COOKIE, v)),
            );
            decode_intended_url(&value).unwrap_or_else(|| "/".to_string())
        }
        None => "/".to_string(),
    };

    let body = LoginResponse {
        user: CurrentUser::new(output.user, output.session.session_id),
        redirect_to,
    };

    Ok((
        AppendHeaders(cookies),
        ApiResponse::ok(body).message("Signed in"),
    )
        .into_response())
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /logout
pub async fn sign_out<U, S>(
    State(state): State<AuthAppState<U, S>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.sessions.clone(), state.config.clone());
        // The cookie is cleared either way.
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out with unusable session token");
        }
    }

    let cleared: Vec<(HeaderName, HeaderValue)> = state
        .config
        .session_cookie()
        .delete_cookie_header()
        .map(|v| (header::SET_COOKIE, v))
        .into_iter()
        .collect();

    (
        AppendHeaders(cleared),
        ApiResponse::success().message("Signed out"),
    )
}

// ============================================================================
// Current user
// ============================================================================

/// GET /me (behind `require_auth`)
pub async fn me(Extension(user): Extension<CurrentUser>) -> ApiResponse<CurrentUser> {
    ApiResponse::ok(user)
}
