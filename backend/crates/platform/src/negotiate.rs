//! Content Negotiation
//!
//! Decides whether a request wants a machine-readable JSON reply or a
//! browser-style redirect. A request expects JSON when either:
//! - it is an AJAX call (`X-Requested-With: XMLHttpRequest`), not a PJAX
//!   navigation, and accepts any content type; or
//! - its most preferred `Accept` entry is a JSON media type.

use axum::http::{HeaderMap, HeaderValue};

/// How an error (or any reply) should be rendered for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Html,
}

impl ResponseFormat {
    /// Pick the format for the given request headers
    pub fn negotiate(headers: &HeaderMap) -> Self {
        if expects_json(headers) {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }
}

/// Whether the client expects a JSON reply
pub fn expects_json(headers: &HeaderMap) -> bool {
    (is_ajax(headers) && !is_pjax(headers) && accepts_any_content_type(headers))
        || wants_json(headers)
}

/// `X-Requested-With: XMLHttpRequest`
pub fn is_ajax(headers: &HeaderMap) -> bool {
    header_str(headers.get("x-requested-with"))
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

/// `X-PJAX: true`
pub fn is_pjax(headers: &HeaderMap) -> bool {
    header_str(headers.get("x-pjax")).is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// The most preferred acceptable type is JSON (`*/json` or `*+json`)
pub fn wants_json(headers: &HeaderMap) -> bool {
    acceptable_content_types(headers)
        .first()
        .is_some_and(|ty| ty.contains("/json") || ty.contains("+json"))
}

/// No `Accept` preference, or the most preferred entry is a full wildcard
pub fn accepts_any_content_type(headers: &HeaderMap) -> bool {
    let types = acceptable_content_types(headers);
    match types.first() {
        None => true,
        Some(first) => first == "*/*" || first == "*",
    }
}

/// Media types from every `Accept` header, most preferred first
///
/// Entries keep their header order when q-values tie. Entries with
/// `q=0` are not acceptable and are dropped. Parameters other than
/// `q` are stripped and types are lowercased.
pub fn acceptable_content_types(headers: &HeaderMap) -> Vec<String> {
    let mut entries: Vec<(String, f32)> = headers
        .get_all(axum::http::header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(parse_accept_entry)
        .filter(|(_, q)| *q > 0.0)
        .collect();

    // sort_by is stable, so equal q-values keep header order.
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.into_iter().map(|(ty, _)| ty).collect()
}

fn parse_accept_entry(entry: &str) -> Option<(String, f32)> {
    let mut parts = entry.split(';');
    let media_type = parts.next()?.trim().to_ascii_lowercase();
    if media_type.is_empty() {
        return None;
    }

    let quality = parts
        .filter_map(|param| param.trim().split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, value)| value.trim().parse::<f32>().ok())
        .map(|q| q.clamp(0.0, 1.0))
        .unwrap_or(1.0);

    Some((media_type, quality))
}

fn header_str(value: Option<&HeaderValue>) -> Option<&str> {
    value.and_then(|v| v.to_str().ok()).map(str::trim)
}
