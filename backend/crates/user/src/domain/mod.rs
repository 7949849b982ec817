//! Domain Layer
//!
//! The user entity and its repository trait.

pub mod entity;
pub mod repository;

pub use entity::{User, normalize_email};
pub use repository::{LocalUserRepository, UserRepository};
