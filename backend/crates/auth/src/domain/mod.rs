//! Domain Layer
//!
//! Session entity, the authenticated-user view, and the session repository.

pub mod current_user;
pub mod repository;
pub mod session;

// Re-exports
pub use current_user::CurrentUser;
pub use repository::{LocalSessionRepository, SessionRepository};
pub use session::AuthSession;
