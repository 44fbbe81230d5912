//! Route table and prefix matching.
//!
//! # Responsibilities
//! - Compile route configuration into an immutable table at startup
//! - Match incoming paths against configured prefixes
//! - Produce the rewritten outbound path (prefix stripped, query preserved
//!   by the forwarder)
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime (no locks needed)
//! - No regex in hot path: O(n) front-to-back prefix scan
//! - First match wins; declaration order is the conflict-resolution rule
//!   for overlapping prefixes
//! - Prefixes match at segment boundaries: `/users` matches `/users` and
//!   `/users/42` but not `/users2`

use url::Url;

use crate::config::RouteConfig;

/// A compiled route: prefix plus pre-parsed target address parts.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path prefix this route matches.
    pub prefix: String,

    /// Target URL scheme ("http" or "https").
    pub scheme: String,

    /// Target authority (host or host:port).
    pub authority: String,

    /// Base path of the target URL, without a trailing slash.
    /// Prepended to the rewritten path when forwarding.
    pub base_path: String,

    /// Remove the matched prefix from the path before forwarding.
    pub strip_prefix: bool,
}

/// The result of a successful route lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub entry: &'a RouteEntry,

    /// The path to send to the backend (prefix stripped when configured).
    pub rewritten_path: String,
}

/// Immutable mapping from path prefixes to backends.
///
/// Built once at startup from configuration; requires no synchronization.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Compile a route table from configuration, preserving declaration
    /// order. Entries whose target fails to parse are skipped with a
    /// warning; validation normally rejects these before we get here.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut entries = Vec::with_capacity(routes.len());

        for route in routes {
            let url = match Url::parse(&route.target) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!(route = %route.name, target = %route.target, error = %e, "Invalid route target, skipping");
                    continue;
                }
            };

            let Some(host) = url.host_str() else {
                tracing::warn!(route = %route.name, target = %route.target, "Route target has no host, skipping");
                continue;
            };

            let authority = match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };

            entries.push(RouteEntry {
                name: route.name.clone(),
                prefix: route.prefix.clone(),
                scheme: url.scheme().to_string(),
                authority,
                base_path: url.path().trim_end_matches('/').to_string(),
                strip_prefix: route.strip_prefix,
            });
        }

        Self { entries }
    }

    /// Look up the first route whose prefix matches the path.
    ///
    /// Returns `None` when no route matches; the caller decides the
    /// default handling. Never panics on any input path.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries
            .iter()
            .find(|entry| prefix_matches(&entry.prefix, path))
            .map(|entry| RouteMatch {
                rewritten_path: rewrite_path(entry, path),
                entry,
            })
    }

    /// Number of compiled routes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no routes are configured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Segment-boundary prefix match: the path equals the prefix or continues
/// with '/' right after it.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

fn rewrite_path(entry: &RouteEntry, path: &str) -> String {
    if !entry.strip_prefix {
        return path.to_string();
    }

    let remainder = &path[entry.prefix.len()..];
    if remainder.is_empty() {
        "/".to_string()
    } else if remainder.starts_with('/') {
        remainder.to_string()
    } else {
        format!("/{}", remainder)
    }
}
