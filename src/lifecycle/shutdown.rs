//! Shutdown coordination for the gateway.
//!
//! # Responsibilities
//! - Fan a single stop signal out to the server loop and background tasks
//! - Treat a vanished coordinator the same as an explicit trigger, so
//!   tasks never outlive the process that spawned them
//!
//! # Design Decisions
//! - Subscribers get a [`ShutdownSignal`] rather than a raw channel end;
//!   the broadcast error variants (lagged, closed) are absorbed here so
//!   callers just await `recv`

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Held by whoever owns the gateway's lifetime (main, or a test). Dropping
/// it counts as a shutdown for every outstanding signal.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Hand out a signal tied to this coordinator.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal(self.tx.subscribe())
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's view of the shutdown broadcast.
pub struct ShutdownSignal(broadcast::Receiver<()>);

impl ShutdownSignal {
    /// Wait until shutdown is triggered or the coordinator is dropped.
    pub async fn recv(&mut self) {
        // A closed channel means the coordinator is gone; that is a
        // shutdown too. Lagged cannot drop the only message we ever send.
        let _ = self.0.recv().await;
    }

    /// A second signal tied to the same coordinator.
    pub fn resubscribe(&self) -> ShutdownSignal {
        ShutdownSignal(self.0.resubscribe())
    }
}
