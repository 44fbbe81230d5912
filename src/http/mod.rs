//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → gateway handler (admit → deadline → route → forward)
//!     → response.rs (gateway-origin JSON envelopes)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::HttpServer;
