//! User Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity and repository trait
//! - `application/` - Use cases (register, find)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! The crate directory doubles as the module directory the api bootstrap
//! loads: `routes.toml` declares where the router is mounted and
//! `migrations/` holds the `users` table.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::{User, UserRepository};
pub use error::{UserError, UserResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::{NAMED_ROUTES, user_router, user_router_generic};
