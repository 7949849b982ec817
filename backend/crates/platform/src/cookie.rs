//! Cookie Management Infrastructure
//!
//! Set-Cookie builders plus the two short-lived cookies the web group uses
//! to carry state across a redirect:
//! - [`FLASH_ERRORS_COOKIE`]: field errors for the next page render
//! - [`INTENDED_URL_COOKIE`]: where to send the user after sign-in
//!
//! Both payloads are base64url encoded so they never contain `;`, `,` or spaces.

use axum::http::{HeaderMap, HeaderValue, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::crypto::{from_base64_url, to_base64_url};

/// Cookie holding flashed validation errors
pub const FLASH_ERRORS_COOKIE: &str = "flash_errors";

/// Cookie holding the URL an unauthenticated user tried to reach
pub const INTENDED_URL_COOKIE: &str = "url.intended";

/// Lifetime of flash and intended-URL cookies
pub const SHORT_LIVED_SECS: i64 = 300;

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Cookie attributes shared by every cookie the backend writes
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age_secs: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl CookieConfig {
    /// Short-lived, HttpOnly cookie with the given name
    pub fn short_lived(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age_secs: Some(SHORT_LIVED_SECS),
            ..Self::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut parts = vec![format!("{}={}", self.name, value)];

        if self.http_only {
            parts.push("HttpOnly".to_string());
        }
        if self.secure {
            parts.push("Secure".to_string());
        }
        parts.push(format!("SameSite={}", self.same_site.as_str()));
        parts.push(format!("Path={}", self.path));
        if let Some(max_age) = self.max_age_secs {
            parts.push(format!("Max-Age={}", max_age));
        }

        parts.join("; ")
    }

    /// Build Set-Cookie header that expires the cookie immediately
    pub fn build_delete_cookie(&self) -> String {
        format!(
            "{}=; HttpOnly; SameSite={}; Path={}; Max-Age=0",
            self.name,
            self.same_site.as_str(),
            self.path
        )
    }

    /// Set-Cookie header value, `None` if the value is not a valid header
    pub fn set_cookie_header(&self, value: &str) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_set_cookie(value)).ok()
    }

    /// Set-Cookie header value that deletes this cookie
    pub fn delete_cookie_header(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build_delete_cookie()).ok()
    }
}

/// Extract a cookie value from request headers
///
/// Looks through every `Cookie` header, not only the first.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// Encode a flash payload as base64url JSON
pub fn encode_flash<T: Serialize>(payload: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(payload)?;
    Ok(to_base64_url(&json))
}

/// Decode a flash payload written by [`encode_flash`]
///
/// Returns `None` for anything tampered with or truncated.
pub fn decode_flash<T: DeserializeOwned>(value: &str) -> Option<T> {
    let bytes = from_base64_url(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Encode an intended URL for storage in [`INTENDED_URL_COOKIE`]
pub fn encode_intended_url(url: &str) -> String {
    to_base64_url(url.as_bytes())
}

/// Decode an intended URL, accepting only same-site absolute paths
pub fn decode_intended_url(value: &str) -> Option<String> {
    let bytes = from_base64_url(value).ok()?;
    let url = String::from_utf8(bytes).ok()?;
    // "//host" and "/\host" are both protocol-relative to a browser.
    let mut chars = url.chars();
    let local = chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'));
    local.then_some(url)
}
