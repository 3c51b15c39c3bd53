//! # Process host abstraction.
//!
//! [`ProcessHost`] is the seam between the supervision core and whatever
//! actually spawns child processes. The core only assumes:
//! - the host can say which role the current process plays;
//! - `fork` returns a live [`Forked`] handle synchronously (the underlying
//!   process startup may complete asynchronously);
//! - the host publishes the five lifecycle signal classes for each handle on
//!   the [`Bus`] it is given at fork time.

use crate::events::Bus;
use crate::error::RuntimeError;
use crate::process::handle::{BoundAddress, Forked};

/// Role of the current process within the supervision group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The single controlling process that owns the worker pool.
    Master,
    /// A spawned child process running the worker routine.
    Worker,
}

/// Signal a worker-role process reports upward to its master.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkerSignal {
    /// The worker is up and running.
    Online,
    /// The worker bound the given address.
    Listening(BoundAddress),
}

/// Spawning facility consumed by the supervision core.
///
/// Implementations publish `WorkerForked`, `WorkerOnline`, `WorkerListening`,
/// `WorkerDisconnected` and `WorkerExited` events for each forked handle on
/// the bus passed to [`fork`](ProcessHost::fork).
pub trait ProcessHost: Send + Sync + 'static {
    /// Which role the current process plays.
    fn role(&self) -> Role;

    /// Spawns one new child process.
    ///
    /// The returned handle exists synchronously even though the child's
    /// startup completes off the critical path.
    fn fork(&self, bus: Bus) -> Result<Forked, RuntimeError>;

    /// Worker-side upcall: report a lifecycle signal to the master.
    ///
    /// No-op in the master role.
    fn announce(&self, signal: WorkerSignal);
}
