//! Error types used by the clustervisor runtime and operator routines.
//!
//! Two enums, split by origin:
//!
//! - [`RuntimeError`] — faults raised by the supervision runtime itself
//!   (construction, spawning, pool exhaustion, escalated routine faults).
//! - [`RoutineError`] — faults raised by operator-supplied routines while
//!   running under a fault boundary.
//!
//! Both types provide `as_label()` for stable snake_case identifiers in
//! logs/metrics.

use thiserror::Error;

/// # Faults raised by the supervision runtime.
///
/// These cover the whole escalation surface: a missing worker capability at
/// construction, a failed process spawn, total pool exhaustion, and routine
/// faults that crossed a fault boundary.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// No worker routine was supplied at construction time.
    #[error("worker routine is required")]
    MissingWorker,

    /// The process host failed to spawn a child process.
    #[error("failed to spawn worker process: {reason}")]
    Spawn {
        /// Host-reported failure detail.
        reason: String,
    },

    /// The live worker registry reached zero entries.
    ///
    /// Always escalates to full shutdown, independent of `kill_on_error`.
    #[error("all workers have died")]
    PoolExhausted,

    /// A fault captured by the master's boundary (master routine or initial
    /// pool spawn).
    #[error("master fault: {0}")]
    MasterFault(#[source] RoutineError),

    /// A fault returned by the worker routine in a worker-role process.
    ///
    /// Not caught by any boundary; the worker process is expected to exit
    /// non-zero with it.
    #[error("worker fault: {0}")]
    WorkerFault(#[source] RoutineError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use clustervisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::PoolExhausted.as_label(), "pool_exhausted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::MissingWorker => "missing_worker",
            RuntimeError::Spawn { .. } => "spawn_failed",
            RuntimeError::PoolExhausted => "pool_exhausted",
            RuntimeError::MasterFault(_) => "master_fault",
            RuntimeError::WorkerFault(_) => "worker_fault",
        }
    }

    /// True if this fault terminates the process regardless of configuration.
    pub fn is_structural(&self) -> bool {
        matches!(self, RuntimeError::PoolExhausted)
    }
}

/// # Faults produced by operator routines.
///
/// Returned by worker/master routines, or synthesized by a fault boundary
/// when a routine panics.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutineError {
    /// The routine failed with an error.
    #[error("routine failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The routine panicked; the boundary captured the payload.
    #[error("routine panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },

    /// The routine observed runtime teardown and stopped cooperatively.
    #[error("routine canceled")]
    Canceled,
}

impl RoutineError {
    /// Wraps an arbitrary error value as a [`RoutineError::Fail`].
    pub fn fail(error: impl ToString) -> Self {
        RoutineError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RoutineError::Fail { .. } => "routine_failed",
            RoutineError::Panicked { .. } => "routine_panicked",
            RoutineError::Canceled => "routine_canceled",
        }
    }
}
