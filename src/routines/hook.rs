//! # Pre-exit hook.
//!
//! The shutdown coordinator runs exactly one [`ExitHook`] before terminating
//! the process. The hook receives the fault that triggered shutdown (if any)
//! and may be asynchronous; termination waits for it to complete. There is no
//! timeout: a hung hook hangs the exit.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::RuntimeError;

/// Shared handle to a pre-exit hook.
pub type ExitHookRef = Arc<dyn ExitHook>;

/// Cleanup run to completion before process termination.
#[async_trait]
pub trait ExitHook: Send + Sync + 'static {
    /// Performs cleanup; `fault` is the error that triggered shutdown, if any.
    async fn run(&self, fault: Option<&RuntimeError>);
}

/// Function-backed pre-exit hook.
///
/// The closure receives an owned clone of the fault to sidestep borrow
/// plumbing in async closures.
pub struct ExitHookFn<F> {
    f: F,
}

impl<F> ExitHookFn<F> {
    /// Creates a new function-backed hook.
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the hook and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> ExitHook for ExitHookFn<F>
where
    F: Fn(Option<RuntimeError>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn run(&self, fault: Option<&RuntimeError>) {
        (self.f)(fault.cloned()).await
    }
}

/// Hook that signals completion immediately; the default.
pub(crate) struct ImmediateHook;

#[async_trait]
impl ExitHook for ImmediateHook {
    async fn run(&self, _fault: Option<&RuntimeError>) {}
}
