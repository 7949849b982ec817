//! Application Layer
//!
//! Use cases and application services.

pub mod find_user;
pub mod register;

// Re-exports
pub use find_user::FindUserUseCase;
pub use register::{RegisterInput, RegisterUseCase};
