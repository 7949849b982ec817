//! Application Bootstrap
//!
//! `boot` runs once per process: it loads every module's routes, wraps them
//! in the `web` middleware group, and registers every module's migration
//! directory. Nothing here runs per request.

pub mod migrations;
pub mod routes;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use kernel::error::app_error::AppError;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

use crate::config::ApiConfig;
use crate::middleware::{WebConfig, web_group};

pub use migrations::{MigrationPaths, module_migration_paths, run_migrations};
pub use routes::{
    LoadedRoutes, ModuleDefinition, NamedRoutes, RouteLoadError, RouteManifest,
    load_module_routes,
};

/// Name of the route guests are redirected to
pub const LOGIN_ROUTE: &str = "login";

/// Everything `main` needs to serve and migrate
#[derive(Debug)]
pub struct Application {
    pub router: Router,
    pub named_routes: NamedRoutes,
    pub migrations: MigrationPaths,
    pub loaded_modules: Vec<&'static str>,
}

/// Compose the application from the module definitions
pub fn boot(
    config: &ApiConfig,
    definitions: Vec<ModuleDefinition>,
) -> anyhow::Result<Application> {
    let modules_root = config.modules_dir.as_path();

    // Migration paths are registered for every module, loaded or not.
    let mut migrations = MigrationPaths::new();
    migrations.register_all(module_migration_paths(modules_root, &definitions));

    let LoadedRoutes {
        router,
        named,
        loaded,
    } = load_module_routes(modules_root, definitions)?;

    if loaded.is_empty() {
        tracing::warn!(
            modules_dir = %modules_root.display(),
            "No module routes were loaded"
        );
    }

    let web = WebConfig {
        login_url: named.url(LOGIN_ROUTE).map(str::to_string),
        cookie_secure: config.auth.cookie_secure,
    };

    let router = web_group(router.fallback(not_found), web).layer(cors_layer(config));

    tracing::info!(
        modules = ?loaded,
        named_routes = named.len(),
        migration_paths = migrations.len(),
        "Application booted"
    );

    Ok(Application {
        router,
        named_routes: named,
        migrations,
        loaded_modules: loaded,
    })
}

async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-requested-with"),
        ]))
        .allow_credentials(true)
}
