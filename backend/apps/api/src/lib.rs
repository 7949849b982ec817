//! API Application
//!
//! Process-level wiring shared by `main` and the integration tests:
//! - `config` - environment configuration
//! - `bootstrap` - module route loader, migration path registrar, `boot()`
//! - `middleware` - the `web` middleware group and central error renderer
//! - `modules` - the fixed list of backend modules

pub mod bootstrap;
pub mod config;
pub mod middleware;
pub mod modules;

pub use bootstrap::{Application, boot};
pub use config::ApiConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
