//! Header rewriting for proxied requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions (RFC 7230 §6.1)
//! - Rewrite Host so the backend sees the gateway as the originating host
//! - Record the real client in X-Forwarded-For / -Host / -Proto
//!
//! # Design Decisions
//! - Connection-named tokens are stripped in addition to the static
//!   hop-by-hop set
//! - X-Forwarded-For is appended to, never replaced, so proxy chains keep
//!   the full client path

use std::net::IpAddr;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Headers that never travel end-to-end.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let named: Vec<HeaderName> = headers
        .get_all("connection")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| name.trim().parse::<HeaderName>().ok())
        .collect();

    for name in named {
        headers.remove(&name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Rewrite origin-related headers for a request about to leave the gateway.
///
/// `authority` is the backend's host[:port]; `original_host` is the Host
/// the client sent, preserved in X-Forwarded-Host.
pub fn apply_forwarding_headers(
    headers: &mut HeaderMap,
    client_ip: IpAddr,
    original_host: Option<HeaderValue>,
    authority: &str,
) {
    if let Ok(host) = HeaderValue::from_str(authority) {
        headers.insert("host", host);
    }

    let client = client_ip.to_string();
    let forwarded_for = match headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        Some(existing) => format!("{}, {}", existing, client),
        None => client,
    };
    if let Ok(value) = HeaderValue::from_str(&forwarded_for) {
        headers.insert("x-forwarded-for", value);
    }

    if let Some(host) = original_host {
        headers.insert("x-forwarded-host", host);
    }
    headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
}
