//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::time::Duration;

use api::bootstrap::{boot, run_migrations};
use api::{ApiConfig, modules};
use auth::PgSessionRepository;
use auth::domain::SessionRepository;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How often expired auth sessions are purged
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,kernel=info,user=info,auth=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    let app = boot(
        &config,
        modules::definitions(pool.clone(), config.auth.clone()),
    )?;

    run_migrations(&pool, &app.migrations).await?;

    spawn_session_cleanup(PgSessionRepository::new(pool.clone()));

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.router
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Purge expired sessions on startup and then periodically
///
/// Failures are logged and never stop the server.
fn spawn_session_cleanup(sessions: PgSessionRepository) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = sessions.delete_expired().await {
                tracing::warn!(
                    error = %e,
                    "Auth session cleanup failed, continuing anyway"
                );
            }
        }
    });
}
