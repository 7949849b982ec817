//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::UserAppState;
pub use router::{NAMED_ROUTES, user_router, user_router_generic};
