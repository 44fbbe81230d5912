//! Admission-control and forwarding pipeline.
//!
//! # Data Flow
//! ```text
//! Admitted request
//!     → deadline.rs (arm per-request deadline)
//!     → routing (match prefix, rewrite path)
//!     → forward.rs (rewrite URI + headers, stream to backend)
//!     → deadline race decides: relay response or 504
//! ```
//!
//! # Design Decisions
//! - Exactly one client-visible outcome per request: the deadline and the
//!   backend response race, the loser is dropped
//! - Errors convert to JSON responses where they occur (error.rs); the
//!   gateway process never dies from a request-path failure

pub mod deadline;
pub mod error;
pub mod forward;
pub mod headers;

pub use deadline::{DeadlineGuard, Outcome};
pub use error::GatewayError;
pub use forward::ProxyForwarder;
