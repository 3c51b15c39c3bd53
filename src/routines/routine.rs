//! # Routine abstraction and function-backed implementation.
//!
//! A [`Routine`] is the unit of operator code the supervisor runs: the worker
//! routine in every worker process, the master routine once in the master.
//! Both receive the supervisor instance, so master routines can add workers at
//! runtime and worker routines can announce lifecycle signals upward.
//!
//! [`RoutineFn`] wraps a closure `F: Fn(Arc<Supervisor>) -> Fut`, producing a
//! fresh future per invocation; shared state belongs in an explicit `Arc`
//! inside the closure.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use clustervisor::{RoutineError, RoutineFn, RoutineRef, Supervisor};
//!
//! let worker: RoutineRef = RoutineFn::arc(|_sup: Arc<Supervisor>| async move {
//!     // serve requests...
//!     Ok::<(), RoutineError>(())
//! });
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::Supervisor;
use crate::error::RoutineError;

/// Shared handle to a routine.
pub type RoutineRef = Arc<dyn Routine>;

/// # Asynchronous unit of operator code.
///
/// Runs under the fault-escalation rules of the role that invokes it: the
/// master routine inside the master's fault boundary, the worker routine bare
/// (a worker-process fault crashes that worker naturally).
#[async_trait]
pub trait Routine: Send + Sync + 'static {
    /// Executes the routine with the owning supervisor as argument.
    async fn run(&self, sup: Arc<Supervisor>) -> Result<(), RoutineError>;
}

/// Function-backed routine implementation.
pub struct RoutineFn<F> {
    f: F,
}

impl<F> RoutineFn<F> {
    /// Creates a new function-backed routine.
    ///
    /// Prefer [`RoutineFn::arc`] when you immediately need a [`RoutineRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the routine and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Routine for RoutineFn<F>
where
    F: Fn(Arc<Supervisor>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RoutineError>> + Send + 'static,
{
    async fn run(&self, sup: Arc<Supervisor>) -> Result<(), RoutineError> {
        (self.f)(sup).await
    }
}

/// Routine that completes immediately; the default master routine.
pub(crate) struct NoopRoutine;

#[async_trait]
impl Routine for NoopRoutine {
    async fn run(&self, _sup: Arc<Supervisor>) -> Result<(), RoutineError> {
        Ok(())
    }
}
