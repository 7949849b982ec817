//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session entity, repository trait
//! - `application/` - Use cases (sign in, sign out, check session)
//! - `infra/` - PostgreSQL and in-memory session stores
//! - `presentation/` - HTTP handlers, DTOs, `require_auth` middleware, router
//!
//! ## Security Model
//! - Credentials are checked against the `user` module's Argon2id hashes
//! - Sessions are server-side rows; the cookie carries `<session_id>.<hmac>`
//! - The router registers the named `login` route used for guest redirects

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::CurrentUser;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemorySessionRepository, PgSessionRepository};
pub use presentation::router::{NAMED_ROUTES, auth_router, auth_router_generic};
