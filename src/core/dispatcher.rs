//! # Worker lifecycle dispatcher.
//!
//! [`Lifecycle`] is the capability set of the supervision loop: spawn a
//! worker plus one handler per signal class. [`Dispatcher`] is the default
//! implementation; specialized supervisors compose by wrapping it and
//! delegating, rather than by overriding pieces of a base class:
//!
//! ```text
//! struct Respawning { inner: Arc<Dispatcher> }
//!
//! impl Lifecycle for Respawning {
//!     async fn exit(&self, worker, status) {
//!         let _ = self.inner.create_worker().await;   // replace first
//!         self.inner.exit(worker, status).await;      // then standard handling
//!     }
//!     // remaining methods delegate to self.inner
//! }
//! ```
//!
//! ## Rules
//! - Handlers log and maintain the registry; they never escalate a fault
//!   themselves except through the exhaustion path.
//! - `exit` is the only handler that mutates the registry, and the only path
//!   by which worker death becomes master-fatal.
//! - The exhaustion check counts remaining handles **after** removal, so
//!   extensions manipulating the registry directly stay consistent with it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::boundary;
use crate::core::registry::Registry;
use crate::core::shutdown::ExitCoordinator;
use crate::error::RuntimeError;
use crate::events::{render, Bus, Event, EventKind};
use crate::logging;
use crate::process::{BoundAddress, ExitStatus, ProcessHost, WorkerHandle, WorkerId};

/// Capability set of the supervision loop.
///
/// All methods are override points; every handler must be non-throwing.
#[async_trait]
pub trait Lifecycle: Send + Sync + 'static {
    /// Spawns one new worker: fork, install its fault boundary, register the
    /// handle. Returns the handle so callers may further decorate it.
    async fn create_worker(&self) -> Result<WorkerHandle, RuntimeError>;

    /// A child process was forked. Informational; no state change.
    async fn fork(&self, worker: WorkerId);

    /// A worker reported it is running. Informational; no state change.
    async fn online(&self, worker: WorkerId);

    /// A worker reported the address it bound. Informational; no state
    /// change.
    async fn listening(&self, worker: WorkerId, address: BoundAddress);

    /// A worker's communication channel was severed; the process may still
    /// be alive. Informational; no state change.
    async fn disconnect(&self, worker: WorkerId);

    /// A worker process terminated: remove exactly its handle, then treat an
    /// empty registry as total pool exhaustion.
    async fn exit(&self, worker: WorkerId, status: ExitStatus);
}

/// Default [`Lifecycle`] implementation.
pub struct Dispatcher {
    host: Arc<dyn ProcessHost>,
    bus: Bus,
    registry: Arc<Registry>,
    shutdown: Arc<ExitCoordinator>,
    scope: Arc<str>,
    runtime: CancellationToken,
}

impl Dispatcher {
    /// Creates the default dispatcher over the wired runtime parts.
    pub fn new(
        host: Arc<dyn ProcessHost>,
        bus: Bus,
        registry: Arc<Registry>,
        shutdown: Arc<ExitCoordinator>,
        scope: Arc<str>,
        runtime: CancellationToken,
    ) -> Self {
        Self {
            host,
            bus,
            registry,
            shutdown,
            scope,
            runtime,
        }
    }

    /// The registry this dispatcher maintains.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

#[async_trait]
impl Lifecycle for Dispatcher {
    async fn create_worker(&self) -> Result<WorkerHandle, RuntimeError> {
        let forked = self.host.fork(self.bus.clone())?;
        let handle = forked.handle;

        boundary::guard_worker(
            handle.clone(),
            forked.faults,
            self.scope.clone(),
            self.bus.clone(),
            self.runtime.clone(),
        );

        if !self.registry.add(handle.clone()).await {
            logging::warn(
                &self.scope,
                &format!("duplicate worker id from host: {}", handle.id()),
            );
        }
        logging::info(&self.scope, &render::created(handle.id()));
        self.bus
            .publish(Event::new(EventKind::WorkerCreated).with_worker(handle.id()));

        Ok(handle)
    }

    async fn fork(&self, worker: WorkerId) {
        logging::info(&self.scope, &render::forked(worker));
    }

    async fn online(&self, worker: WorkerId) {
        logging::info(&self.scope, &render::online(worker));
    }

    async fn listening(&self, worker: WorkerId, address: BoundAddress) {
        logging::info(&self.scope, &render::listening(worker, &address));
    }

    async fn disconnect(&self, worker: WorkerId) {
        logging::info(&self.scope, &render::disconnected(worker));
    }

    async fn exit(&self, worker: WorkerId, status: ExitStatus) {
        logging::info(&self.scope, &render::exited(worker, &status));

        let removed = self.registry.remove(worker).await;
        if removed.is_none() {
            // Stale or foreign exit signal; nothing of ours to clean up.
            return;
        }

        if self.registry.is_empty().await {
            logging::error(&self.scope, &render::pool_exhausted());
            self.bus.publish(Event::new(EventKind::PoolExhausted));
            self.shutdown.exit(Some(RuntimeError::PoolExhausted)).await;
        }
    }
}
