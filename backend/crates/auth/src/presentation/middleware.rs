//! Auth Middleware
//!
//! `require_auth` guards protected routes: it resolves the session cookie
//! to a [`CurrentUser`] and inserts it into request extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;
use user::UserRepository;

use crate::application::CheckSessionUseCase;
use crate::domain::{CurrentUser, SessionRepository};
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a valid auth session
///
/// Rejections are `AppError::Unauthorized`, so the web group turns them
/// into a login redirect for browser clients.
pub async fn require_auth<U, S>(
    State(state): State<AuthAppState<U, S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name)
        .ok_or(AuthError::SessionInvalid)?;

    let current_user: CurrentUser =
        CheckSessionUseCase::new(state.users.clone(), state.sessions.clone(), state.config.clone())
            .execute(&token)
            .await?;

    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}
