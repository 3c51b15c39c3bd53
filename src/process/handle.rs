//! # Worker handles.
//!
//! A [`WorkerHandle`] is an opaque, cheaply clonable reference to one spawned
//! child process: a unique identifier assigned by the spawning facility plus
//! a fire-and-forget kill capability. The registry holds the owning entry
//! from spawn until the worker's own exit signal removes it.
//!
//! Fault emission is deliberately **not** on the handle: [`ProcessHost::fork`]
//! returns the handle together with a one-shot [`FaultSignal`], so the fault
//! boundary for a worker is installed explicitly at the spawn point and
//! nowhere else.
//!
//! [`ProcessHost::fork`]: crate::process::ProcessHost::fork

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::RoutineError;

/// Unique worker identifier assigned by the spawning facility.
pub type WorkerId = u64;

/// One-shot channel carrying a worker's first uncaught fault to its boundary.
pub type FaultSignal = oneshot::Receiver<RoutineError>;

/// Kill capability of a spawned child process.
pub trait WorkerProcess: Send + Sync + 'static {
    /// Requests termination of the child with the given status.
    ///
    /// Fire-and-forget: no acknowledgement is awaited.
    fn kill(&self, code: i32);
}

/// Opaque reference to a spawned worker process.
#[derive(Clone)]
pub struct WorkerHandle {
    id: WorkerId,
    proc: Arc<dyn WorkerProcess>,
}

impl WorkerHandle {
    /// Creates a handle over a host-provided process capability.
    pub fn new(id: WorkerId, proc: Arc<dyn WorkerProcess>) -> Self {
        Self { id, proc }
    }

    /// The identifier assigned by the spawning facility.
    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Requests termination of the worker (fire-and-forget).
    pub fn kill(&self, code: i32) {
        self.proc.kill(code);
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle").field("id", &self.id).finish()
    }
}

/// Result of a successful fork: the handle plus the channel the worker's
/// fault boundary listens on.
pub struct Forked {
    /// Handle to the new worker.
    pub handle: WorkerHandle,
    /// Channel carrying the worker's first uncaught fault.
    pub faults: FaultSignal,
}

/// Address a worker reported binding to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundAddress {
    /// Host or interface address.
    pub address: String,
    /// Bound port, as reported.
    pub port: String,
}

impl fmt::Display for BoundAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Exit status of a terminated worker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExitStatus {
    /// Process exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Name of the terminating signal, when killed by one.
    pub signal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_address_displays_as_pair() {
        let addr = BoundAddress {
            address: "127.0.0.1".to_string(),
            port: "8080".to_string(),
        };
        assert_eq!(addr.to_string(), "127.0.0.1:8080");
    }
}
