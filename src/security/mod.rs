//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP window budget)
//!     → Pass to deadline + routing
//! ```
//!
//! # Design Decisions
//! - Admission is the first pipeline stage: rejected requests never arm a
//!   deadline or touch a backend
//! - Fail closed: a rejected request gets a 429 and nothing else happens

pub mod rate_limit;

pub use rate_limit::RateLimiter;
