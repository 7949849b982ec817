//! Environment Configuration
//!
//! All settings come from the process environment (after `.env` is loaded
//! by `dotenvy` in `main`). `from_vars` takes a lookup function so tests can
//! supply variables without touching the real environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use thiserror::Error;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

/// Default modules root, relative to the workspace root
pub const DEFAULT_MODULES_DIR: &str = "backend/crates";

/// Default CORS allow-list
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// API process configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Directory holding one sub-directory per module
    pub modules_dir: PathBuf,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let modules_dir = PathBuf::from(
            lookup("MODULES_DIR").unwrap_or_else(|| DEFAULT_MODULES_DIR.to_string()),
        );

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let auth = auth_config(&lookup)?;

        Ok(Self {
            database_url,
            bind_addr,
            modules_dir,
            frontend_origins,
            auth,
        })
    }
}

fn auth_config<F>(lookup: &F) -> Result<AuthConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match lookup("AUTH_SESSION_SECRET") {
        Some(secret_b64) => AuthConfig {
            session_secret: decode_secret(&secret_b64)?,
            ..AuthConfig::default()
        },
        // Development builds may run without a configured secret.
        None if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_SESSION_SECRET not set, using a random secret");
            AuthConfig::development()
        }
        None => return Err(ConfigError::Missing("AUTH_SESSION_SECRET")),
    };

    if let Some(secure) = lookup("AUTH_COOKIE_SECURE") {
        config.cookie_secure = parse_bool(&secure).ok_or_else(|| ConfigError::Invalid {
            var: "AUTH_COOKIE_SECURE",
            reason: format!("expected true or false, got {secure:?}"),
        })?;
    }

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .map_err(|e| ConfigError::Invalid {
            var: "AUTH_SESSION_SECRET",
            reason: e.to_string(),
        })?;

    bytes.try_into().map_err(|bytes: Vec<u8>| ConfigError::Invalid {
        var: "AUTH_SESSION_SECRET",
        reason: format!("expected 32 bytes, got {}", bytes.len()),
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
