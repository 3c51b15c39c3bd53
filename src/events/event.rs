//! # Lifecycle events emitted by the process host and the supervision core.
//!
//! [`EventKind`] classifies events in two groups:
//! - **Lifecycle signals** — the five classes emitted by the process host
//!   about a specific worker handle (fork, online, listening, disconnect,
//!   exit). These are the events the supervisor's listener routes to the
//!   [`Lifecycle`](crate::Lifecycle) handlers.
//! - **Supervision events** — decisions made by the core itself (worker
//!   created/faulted, master faulted, pool exhausted), published so external
//!   subscribers (metrics, audits) can observe them.
//!
//! The [`Event`] struct carries a globally monotonic sequence number, a
//! wall-clock timestamp, and optional per-kind metadata set via `with_*`
//! builders.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::process::{BoundAddress, WorkerId};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle signals (published by the process host) ===
    /// A child process was forked.
    ///
    /// Sets: `worker`.
    WorkerForked,

    /// A worker reported that it is up and running.
    ///
    /// Sets: `worker`.
    WorkerOnline,

    /// A worker reported the address it is bound to.
    ///
    /// Sets: `worker`, `address`.
    WorkerListening,

    /// A worker's communication channel was severed; the process may still
    /// be alive.
    ///
    /// Sets: `worker`.
    WorkerDisconnected,

    /// A worker process terminated.
    ///
    /// Sets: `worker`, `code` and/or `signal`.
    WorkerExited,

    // === Supervision events (published by the core) ===
    /// A worker handle was created and entered into the registry.
    ///
    /// Sets: `worker`.
    WorkerCreated,

    /// A worker's fault boundary captured an uncaught fault; the worker is
    /// being killed.
    ///
    /// Sets: `worker`, `reason`.
    WorkerFaulted,

    /// The master's fault boundary captured an uncaught fault.
    ///
    /// Sets: `reason`.
    MasterFaulted,

    /// The live worker registry reached zero entries.
    PoolExhausted,
}

impl EventKind {
    /// True for the five signal classes emitted by the process host.
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            EventKind::WorkerForked
                | EventKind::WorkerOnline
                | EventKind::WorkerListening
                | EventKind::WorkerDisconnected
                | EventKind::WorkerExited
        )
    }
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Worker the event refers to, if any.
    pub worker: Option<WorkerId>,
    /// Bound address reported by a listening worker.
    pub address: Option<BoundAddress>,
    /// Exit status code reported for a terminated worker.
    pub code: Option<i32>,
    /// Terminating signal name reported for a terminated worker.
    pub signal: Option<Arc<str>>,
    /// Human-readable fault detail.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            address: None,
            code: None,
            signal: None,
            reason: None,
        }
    }

    /// Attaches the worker identifier.
    #[inline]
    pub fn with_worker(mut self, id: WorkerId) -> Self {
        self.worker = Some(id);
        self
    }

    /// Attaches a bound address.
    #[inline]
    pub fn with_address(mut self, address: BoundAddress) -> Self {
        self.address = Some(address);
        self
    }

    /// Attaches an exit status code.
    #[inline]
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches a terminating signal name.
    #[inline]
    pub fn with_signal(mut self, signal: impl Into<Arc<str>>) -> Self {
        self.signal = Some(signal.into());
        self
    }

    /// Attaches a human-readable fault detail.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::WorkerForked);
        let b = Event::new(EventKind::WorkerForked);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_set_fields() {
        let ev = Event::new(EventKind::WorkerExited)
            .with_worker(3)
            .with_code(0)
            .with_signal("SIGTERM");
        assert_eq!(ev.worker, Some(3));
        assert_eq!(ev.code, Some(0));
        assert_eq!(ev.signal.as_deref(), Some("SIGTERM"));
        assert!(ev.kind.is_signal());
        assert!(!EventKind::PoolExhausted.is_signal());
    }
}
