//! Fixed-window rate limiting keyed by client IP.
//!
//! # Responsibilities
//! - Count requests per client within the current window
//! - Admit or reject each request against the configured limit
//! - Reset every client's budget on a single process-wide tick
//!
//! # Design Decisions
//! - Fixed window over sliding window: O(1) memory per client per window,
//!   at the cost of synchronized resets at window boundaries
//! - Counters live in a sharded map (dashmap) so concurrent admits from
//!   different clients never contend on one lock
//! - The reset tick clears the map instead of zeroing entries in place:
//!   counters reset and idle clients are evicted in one operation, bounding
//!   memory to the distinct clients of a single window

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::lifecycle::ShutdownSignal;

/// Per-client request counters for the current window.
///
/// Shared across all in-flight requests; admission and reset synchronize
/// through the map's shard locks, so increments are never lost and a reset
/// never interleaves with an increment into an inconsistent count.
#[derive(Debug)]
pub struct RateLimiter {
    counts: DashMap<IpAddr, u32>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            counts: DashMap::new(),
            limit: config.limit,
            window: Duration::from_millis(config.window_ms),
        }
    }

    /// Record a request from `client` and decide admission.
    ///
    /// The counter increments on every call, admitted or not; once the
    /// post-increment count exceeds the limit, this and every later call
    /// in the same window returns false. A client seen for the first time
    /// starts at zero before the increment.
    pub fn admit(&self, client: IpAddr) -> bool {
        let mut count = self.counts.entry(client).or_insert(0);
        *count = count.saturating_add(1);
        *count <= self.limit
    }

    /// Reset every client's budget. Clearing the map also evicts entries
    /// for clients not seen again, keeping the key set bounded.
    pub fn reset_all(&self) {
        let evicted = self.counts.len();
        self.counts.clear();
        tracing::debug!(clients = evicted, "Rate limit window reset");
    }

    /// The configured window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of clients tracked in the current window.
    pub fn tracked_clients(&self) -> usize {
        self.counts.len()
    }

    /// Run the global reset tick until shutdown is signalled.
    ///
    /// One task per process; every client's counter resets on the same
    /// tick, independent of any individual request.
    pub async fn run_reset_task(self: Arc<Self>, mut shutdown: ShutdownSignal) {
        tracing::debug!(
            window_ms = self.window().as_millis() as u64,
            "Rate limit reset task started"
        );

        let mut interval = tokio::time::interval(self.window);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => self.reset_all(),
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit reset task stopping");
                    break;
                }
            }
        }
    }
}
