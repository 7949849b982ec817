//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use user::{PgUserRepository, UserRepository};

use crate::application::config::AuthConfig;
use crate::domain::SessionRepository;
use crate::infra::PgSessionRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Named routes, relative to the module's mount prefix
pub const NAMED_ROUTES: &[(&str, &str)] = &[
    ("login", "/login"),
    ("logout", "/logout"),
    ("me", "/me"),
];

/// Create the Auth router with PostgreSQL repositories
pub fn auth_router(
    users: PgUserRepository,
    sessions: PgSessionRepository,
    config: AuthConfig,
) -> Router {
    auth_router_generic(users, sessions, config)
}

/// Create an Auth router for any repository implementations
pub fn auth_router_generic<U, S>(users: U, sessions: S, config: AuthConfig) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        users: Arc::new(users),
        sessions: Arc::new(sessions),
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<U, S>,
        ));

    Router::new()
        .route(
            "/login",
            get(handlers::login_page).post(handlers::sign_in::<U, S>),
        )
        .route("/logout", post(handlers::sign_out::<U, S>))
        .merge(protected)
        .with_state(state)
}
