//! Backend Modules
//!
//! The fixed, explicit list of modules the bootstrap loads. To add a
//! module, append its definition here and give its crate a `routes.toml`.

use auth::{AuthConfig, PgSessionRepository, auth_router};
use sqlx::PgPool;
use user::{PgUserRepository, user_router};

use crate::bootstrap::ModuleDefinition;

pub const USER_MODULE: &str = "User";
pub const AUTH_MODULE: &str = "Auth";

/// Module definitions backed by PostgreSQL
pub fn definitions(pool: PgPool, auth_config: AuthConfig) -> Vec<ModuleDefinition> {
    let users = PgUserRepository::new(pool.clone());
    let sessions = PgSessionRepository::new(pool);

    vec![
        ModuleDefinition::new(USER_MODULE, "user", user::NAMED_ROUTES, {
            let users = users.clone();
            move || user_router(users)
        }),
        ModuleDefinition::new(AUTH_MODULE, "auth", auth::NAMED_ROUTES, move || {
            auth_router(users, sessions, auth_config)
        }),
    ]
}
