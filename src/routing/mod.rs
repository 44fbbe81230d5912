//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → parse target URLs
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path):
//!     → table.rs (front-to-back prefix scan)
//!     → Return: RouteMatch (entry + rewritten path) or None
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod table;

pub use table::{RouteEntry, RouteMatch, RouteTable};
