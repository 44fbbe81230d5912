//! Edge gateway library.
//!
//! Admission-controlled HTTP gateway: per-client fixed-window rate limiting,
//! per-request deadlines, prefix-based routing, and streaming request
//! forwarding to backend services.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
