//! Infrastructure Layer
//!
//! Session store implementations.

pub mod memory;
pub mod postgres;

pub use memory::InMemorySessionRepository;
pub use postgres::PgSessionRepository;
