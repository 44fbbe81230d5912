//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate route prefixes and target URLs
//! - Validate value ranges (limits and timeouts nonzero, address parses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("route {name:?}: prefix {prefix:?} must start with '/'")]
    InvalidPrefix { name: String, prefix: String },

    #[error("route {name:?}: target {target:?} is not an absolute http(s) URL")]
    InvalidTarget { name: String, target: String },

    #[error("duplicate route name {0:?}")]
    DuplicateRouteName(String),

    #[error("rate_limit.limit must be greater than zero")]
    ZeroRateLimit,

    #[error("rate_limit.window_ms must be greater than zero")]
    ZeroWindow,

    #[error("timeouts.request_ms must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let mut seen_names = Vec::new();
    for route in &config.routes {
        if !route.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                name: route.name.clone(),
                prefix: route.prefix.clone(),
            });
        }

        match Url::parse(&route.target) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => errors.push(ValidationError::InvalidTarget {
                name: route.name.clone(),
                target: route.target.clone(),
            }),
        }

        if seen_names.contains(&route.name) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        } else {
            seen_names.push(route.name.clone());
        }
    }

    if config.rate_limit.limit == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }
    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
