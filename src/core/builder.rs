//! # Supervisor builder.
//!
//! Wires the runtime parts — bus, registry, dispatcher, subscriber set, exit
//! coordinator, runtime token — and returns the shared `Arc<Supervisor>`.
//!
//! Construction accepts either a configuration structure
//! ([`SupervisorBuilder::new`]) or a bare worker capability
//! ([`SupervisorBuilder::from_worker`]). The worker routine is the one
//! mandatory input: `build()` fails with [`RuntimeError::MissingWorker`]
//! without it.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{self, Config, EnvOverrides};
use crate::core::dispatcher::{Dispatcher, Lifecycle};
use crate::core::registry::Registry;
use crate::core::shutdown::{ExitCoordinator, Terminator};
use crate::core::supervisor::Supervisor;
use crate::error::RuntimeError;
use crate::events::Bus;
use crate::process::{LocalHost, ProcessHost};
use crate::routines::{ExitHookRef, ImmediateHook, NoopRoutine, RoutineRef};
use crate::subscribers::{Subscribe, SubscriberSet};

/// Decoration applied to the default dispatcher at build time.
type LifecycleDecorator = Box<dyn FnOnce(Arc<Dispatcher>) -> Arc<dyn Lifecycle> + Send>;

/// Builder for a wired [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: Config,
    env: Option<EnvOverrides>,
    worker: Option<RoutineRef>,
    master: Option<RoutineRef>,
    before_exit: Option<ExitHookRef>,
    host: Option<Arc<dyn ProcessHost>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    decorate: Option<LifecycleDecorator>,
    terminator: Option<Terminator>,
}

impl SupervisorBuilder {
    /// Creates a builder from a configuration structure.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            env: None,
            worker: None,
            master: None,
            before_exit: None,
            host: None,
            subscribers: Vec::new(),
            decorate: None,
            terminator: None,
        }
    }

    /// Creates a builder from a bare worker capability with default
    /// configuration.
    pub fn from_worker(worker: RoutineRef) -> Self {
        Self::new(Config::default()).with_worker(worker)
    }

    /// Sets the required worker routine.
    pub fn with_worker(mut self, worker: RoutineRef) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Sets the master routine (default: no-op).
    pub fn with_master(mut self, master: RoutineRef) -> Self {
        self.master = Some(master);
        self
    }

    /// Sets the pre-exit hook (default: signal completion immediately).
    pub fn with_before_exit(mut self, hook: ExitHookRef) -> Self {
        self.before_exit = Some(hook);
        self
    }

    /// Sets the process host (default: [`LocalHost`]).
    pub fn with_host(mut self, host: Arc<dyn ProcessHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets event subscribers for observability.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Wraps the default dispatcher with a specialized [`Lifecycle`].
    ///
    /// The wrapper receives the fully wired default and composes by
    /// delegation — the standard extension mechanism for auto-respawn,
    /// metrics-on-create, and similar specializations.
    pub fn decorate_lifecycle(
        mut self,
        decorate: impl FnOnce(Arc<Dispatcher>) -> Arc<dyn Lifecycle> + Send + 'static,
    ) -> Self {
        self.decorate = Some(Box::new(decorate));
        self
    }

    /// Supplies a pre-captured environment snapshot instead of reading the
    /// ambient environment at build time.
    pub fn with_env_overrides(mut self, env: EnvOverrides) -> Self {
        self.env = Some(env);
        self
    }

    /// Replaces the process terminator (default: [`std::process::exit`]).
    ///
    /// Embedders and tests use this to observe the exit protocol in-process.
    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Builds and returns the supervisor.
    ///
    /// This is the single configuration-resolution point: the environment is
    /// read here (unless a snapshot was supplied) and never again.
    pub fn build(self) -> Result<Arc<Supervisor>, RuntimeError> {
        let worker = self.worker.ok_or(RuntimeError::MissingWorker)?;
        let env = self.env.unwrap_or_else(EnvOverrides::capture);
        let resolved = config::resolve(&self.cfg, &env);

        let bus = Bus::new(resolved.bus_capacity);
        let runtime = CancellationToken::new();
        let registry = Arc::new(Registry::new());

        let host: Arc<dyn ProcessHost> = match self.host {
            Some(host) => host,
            None => Arc::new(LocalHost::new().map_err(|e| RuntimeError::Spawn {
                reason: e.to_string(),
            })?),
        };

        let hook = self
            .before_exit
            .unwrap_or_else(|| Arc::new(ImmediateHook));
        let terminator = self
            .terminator
            .unwrap_or_else(|| Box::new(|code| std::process::exit(code)));
        let shutdown = Arc::new(ExitCoordinator::new(hook, runtime.clone(), terminator));

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&host),
            bus.clone(),
            Arc::clone(&registry),
            Arc::clone(&shutdown),
            resolved.scope.clone(),
            runtime.clone(),
        ));
        let lifecycle: Arc<dyn Lifecycle> = match self.decorate {
            Some(decorate) => decorate(Arc::clone(&dispatcher)),
            None => dispatcher,
        };

        let master = self.master.unwrap_or_else(|| Arc::new(NoopRoutine));
        let subs = Arc::new(SubscriberSet::new(self.subscribers));

        Ok(Arc::new(Supervisor::new_internal(
            resolved, worker, master, host, bus, registry, lifecycle, subs, shutdown, runtime,
        )))
    }
}
