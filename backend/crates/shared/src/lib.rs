//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" every module speaks:
//! - The JSON response envelope (`{success, data?, message?}` / `{success, error}`)
//! - The application error taxonomy and its HTTP mapping
//! - Common primitive value objects (ID types)
//!
//! **Design Principle**: Only include things whose shape is part of the
//! public HTTP contract and must stay identical across all modules.

pub mod error {
    pub mod api_error;
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
    pub mod validation;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod response;
