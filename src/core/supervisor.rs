//! # Supervisor: role dispatch, master startup, error escalation.
//!
//! One [`Supervisor`] instance exists per process; [`start`](Supervisor::start)
//! performs master startup in the controlling process and worker startup in a
//! spawned one — exactly one of the two per process instance, and a repeated
//! `start()` is a guarded no-op (no double pool spawn, no duplicate listener).
//!
//! ## Master startup ordering
//! ```text
//! start() ── role() == Master
//!   ├─ warn if the worker count was defaulted (not config, not environment)
//!   ├─ spawn lifecycle listener:
//!   │     Bus ──► SubscriberSet::emit ──► Lifecycle handler per signal class
//!   │            (fork / online / listening / disconnect / exit)
//!   ├─ supervised( fault boundary )
//!   │     ├─ create_worker() × num_workers      (pool ready before master runs)
//!   │     └─ master routine(Arc<Supervisor>)
//!   └─ captured fault ──► master_error()
//! ```
//!
//! The master routine observes a fully-populated initial pool, and any error
//! it raises — synchronous or asynchronous — lands in the boundary, never at
//! the caller of `start()`.
//!
//! ## Worker startup
//! Announce `online` to the host, then run the worker routine. No boundary is
//! installed here: a worker-side top-level fault propagates out so the worker
//! process dies naturally, symmetric with the master killing it from outside.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::config::ResolvedConfig;
use crate::core::boundary::supervised;
use crate::core::dispatcher::Lifecycle;
use crate::core::registry::Registry;
use crate::core::shutdown::ExitCoordinator;
use crate::error::{RoutineError, RuntimeError};
use crate::events::{render, Bus, Event, EventKind};
use crate::logging;
use crate::process::{ExitStatus, ProcessHost, Role, WorkerHandle, WorkerSignal};
use crate::routines::RoutineRef;
use crate::subscribers::SubscriberSet;

/// Owns the worker pool and the supervision loop.
///
/// Built by [`SupervisorBuilder`](crate::SupervisorBuilder); shared as
/// `Arc<Supervisor>` with the operator routines it runs.
pub struct Supervisor {
    cfg: ResolvedConfig,
    worker: RoutineRef,
    master: RoutineRef,
    host: Arc<dyn ProcessHost>,
    bus: Bus,
    registry: Arc<Registry>,
    lifecycle: Arc<dyn Lifecycle>,
    subs: Arc<SubscriberSet>,
    shutdown: Arc<ExitCoordinator>,
    runtime: CancellationToken,
    started: AtomicBool,
}

impl Supervisor {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_internal(
        cfg: ResolvedConfig,
        worker: RoutineRef,
        master: RoutineRef,
        host: Arc<dyn ProcessHost>,
        bus: Bus,
        registry: Arc<Registry>,
        lifecycle: Arc<dyn Lifecycle>,
        subs: Arc<SubscriberSet>,
        shutdown: Arc<ExitCoordinator>,
        runtime: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            worker,
            master,
            host,
            bus,
            registry,
            lifecycle,
            subs,
            shutdown,
            runtime,
            started: AtomicBool::new(false),
        }
    }

    /// Starts supervision for the role of the current process.
    ///
    /// In the master role this resolves when the master routine returns;
    /// supervision (listener, monitors, boundary guards) continues on spawned
    /// tasks. In the worker role it runs the worker routine to completion and
    /// propagates its fault, if any, so the process can exit non-zero.
    pub async fn start(self: Arc<Self>) -> Result<(), RuntimeError> {
        if self.started.swap(true, AtomicOrdering::SeqCst) {
            return Ok(());
        }
        match self.host.role() {
            Role::Master => self.start_master().await,
            Role::Worker => self.start_worker().await,
        }
    }

    async fn start_master(self: Arc<Self>) -> Result<(), RuntimeError> {
        if !self.cfg.workers_explicit {
            logging::warn(
                &self.cfg.scope,
                &render::workers_defaulted(self.cfg.num_workers),
            );
        }

        self.spawn_lifecycle_listener();

        let sup = Arc::clone(&self);
        let outcome = supervised(async move {
            for _ in 0..sup.cfg.num_workers {
                sup.create_worker().await.map_err(RoutineError::fail)?;
            }
            sup.master.run(Arc::clone(&sup)).await
        })
        .await;

        if let Err(fault) = outcome {
            self.master_error(fault).await;
        }
        Ok(())
    }

    async fn start_worker(self: Arc<Self>) -> Result<(), RuntimeError> {
        self.host.announce(WorkerSignal::Online);
        let sup = Arc::clone(&self);
        self.worker.run(sup).await.map_err(RuntimeError::WorkerFault)
    }

    /// Handles one uncaught master-side fault.
    ///
    /// Logs the fault; if `kill_on_error` is set (the default), logs the
    /// fatal line and invokes the shutdown coordinator. Otherwise the master
    /// keeps running — an explicit debugging override.
    pub async fn master_error(&self, fault: RoutineError) {
        let detail = fault.to_string();
        logging::error(&self.cfg.scope, &render::master_fault(&detail));
        self.bus
            .publish(Event::new(EventKind::MasterFaulted).with_reason(detail));

        if self.cfg.kill_on_error {
            logging::error(&self.cfg.scope, &render::master_fatal());
            self.shutdown
                .exit(Some(RuntimeError::MasterFault(fault)))
                .await;
        }
    }

    /// Spawns one new worker through the configured [`Lifecycle`].
    pub async fn create_worker(&self) -> Result<WorkerHandle, RuntimeError> {
        self.lifecycle.create_worker().await
    }

    /// Runs the pre-exit hook and terminates with the fault-derived status.
    pub async fn exit_master(&self, fault: Option<RuntimeError>) {
        self.shutdown.exit(fault).await;
    }

    /// Worker-side upcall: report a lifecycle signal to the master.
    pub fn announce(&self, signal: WorkerSignal) {
        self.host.announce(signal);
    }

    /// The worker routine this supervisor was built with.
    pub fn worker(&self) -> RoutineRef {
        Arc::clone(&self.worker)
    }

    /// The live worker registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// The event bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// The immutable runtime configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.cfg
    }

    /// Role of the current process, as reported by the host.
    pub fn role(&self) -> Role {
        self.host.role()
    }

    /// Routes bus events to subscribers and the lifecycle handlers until the
    /// runtime token is cancelled.
    fn spawn_lifecycle_listener(&self) {
        let mut rx = self.bus.subscribe();
        let subs = Arc::clone(&self.subs);
        let lifecycle = Arc::clone(&self.lifecycle);
        let runtime = self.runtime.clone();
        let scope = self.cfg.scope.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = runtime.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => {
                            subs.emit(&ev).await;
                            dispatch_signal(&*lifecycle, &ev).await;
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            logging::warn(
                                &scope,
                                &format!("lifecycle listener lagged, skipped {skipped} events"),
                            );
                        }
                    }
                }
            }
        });
    }
}

/// Routes one of the five signal classes to its correspondingly named
/// handler. Supervision events pass through untouched.
async fn dispatch_signal(lifecycle: &dyn Lifecycle, ev: &Event) {
    if !ev.kind.is_signal() {
        return;
    }
    let Some(id) = ev.worker else {
        return;
    };
    match ev.kind {
        EventKind::WorkerForked => lifecycle.fork(id).await,
        EventKind::WorkerOnline => lifecycle.online(id).await,
        EventKind::WorkerListening => {
            lifecycle
                .listening(id, ev.address.clone().unwrap_or_default())
                .await;
        }
        EventKind::WorkerDisconnected => lifecycle.disconnect(id).await,
        EventKind::WorkerExited => {
            lifecycle
                .exit(
                    id,
                    ExitStatus {
                        code: ev.code,
                        signal: ev.signal.as_deref().map(str::to_string),
                    },
                )
                .await;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio::time::timeout;

    use crate::config::{Config, EnvOverrides};
    use crate::core::SupervisorBuilder;
    use crate::routines::RoutineFn;
    use crate::testing::{eventually, recording_terminator, RecordingHook, SimHost};

    struct Rig {
        sup: Arc<Supervisor>,
        host: Arc<SimHost>,
        hook: Arc<RecordingHook>,
        codes: Arc<Mutex<Vec<i32>>>,
        exited: Arc<Notify>,
    }

    fn noop() -> RoutineRef {
        RoutineFn::arc(|_sup: Arc<Supervisor>| async move { Ok(()) })
    }

    fn rig(num_workers: usize, kill_on_error: bool, master: Option<RoutineRef>) -> Rig {
        let host = SimHost::master();
        let hook = RecordingHook::new();
        let codes = Arc::new(Mutex::new(Vec::new()));
        let exited = Arc::new(Notify::new());

        let cfg = Config {
            num_workers: Some(num_workers),
            kill_on_error,
            ..Config::default()
        };
        let mut builder = SupervisorBuilder::new(cfg)
            .with_worker(noop())
            .with_host(host.clone())
            .with_before_exit(hook.clone())
            .with_env_overrides(EnvOverrides::default())
            .with_terminator(recording_terminator(codes.clone(), exited.clone()));
        if let Some(master) = master {
            builder = builder.with_master(master);
        }

        Rig {
            sup: builder.build().expect("build"),
            host,
            hook,
            codes,
            exited,
        }
    }

    #[test]
    fn construction_requires_worker_capability() {
        let built = SupervisorBuilder::new(Config::default())
            .with_env_overrides(EnvOverrides::default())
            .build();
        match built {
            Err(err) => assert_eq!(err, RuntimeError::MissingWorker),
            Ok(_) => panic!("construction without a worker capability must fail"),
        }
    }

    #[test]
    fn worker_routine_is_retrievable_unchanged() {
        let worker = noop();
        let sup = SupervisorBuilder::from_worker(worker.clone())
            .with_host(SimHost::master())
            .with_env_overrides(EnvOverrides::default())
            .build()
            .expect("build");
        assert!(Arc::ptr_eq(&worker, &sup.worker()));
    }

    #[tokio::test]
    async fn start_spawns_pool_then_runs_master_once() {
        let seen: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in = Arc::clone(&seen);
        let master: RoutineRef = RoutineFn::arc(move |sup: Arc<Supervisor>| {
            let seen = Arc::clone(&seen_in);
            async move {
                let pool = sup.registry().len().await;
                seen.lock().unwrap().push((Arc::as_ptr(&sup) as usize, pool));
                Ok(())
            }
        });

        let rig = rig(3, true, Some(master));
        rig.sup.clone().start().await.expect("start");

        assert_eq!(rig.sup.registry().len().await, 3);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "master routine must run exactly once");
        assert_eq!(seen[0].0, Arc::as_ptr(&rig.sup) as usize);
        assert_eq!(seen[0].1, 3, "master must observe the full initial pool");
        assert!(rig.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_start_is_a_guarded_noop() {
        let runs = Arc::new(Mutex::new(0usize));
        let runs_in = Arc::clone(&runs);
        let master: RoutineRef = RoutineFn::arc(move |_sup: Arc<Supervisor>| {
            let runs = Arc::clone(&runs_in);
            async move {
                *runs.lock().unwrap() += 1;
                Ok(())
            }
        });

        let rig = rig(2, true, Some(master));
        rig.sup.clone().start().await.expect("first start");
        rig.sup.clone().start().await.expect("second start");

        assert_eq!(rig.sup.registry().len().await, 2, "pool must not double-spawn");
        assert_eq!(*runs.lock().unwrap(), 1);

        // One exit signal removes exactly one handle, even after the second
        // start() call.
        rig.sup
            .bus()
            .publish(Event::new(EventKind::WorkerExited).with_worker(1).with_code(0));
        let registry = Arc::clone(rig.sup.registry());
        eventually("single removal", move || {
            let registry = Arc::clone(&registry);
            async move { registry.len().await == 1 }
        })
        .await;
        assert_eq!(rig.sup.registry().ids().await, vec![2]);
    }

    async fn exhaustion_case(num_workers: usize) {
        let rig = rig(num_workers, true, None);
        rig.sup.clone().start().await.expect("start");

        let ids = rig.sup.registry().ids().await;
        assert_eq!(ids.len(), num_workers);
        for id in ids {
            rig.sup
                .bus()
                .publish(Event::new(EventKind::WorkerExited).with_worker(id).with_code(0));
        }

        timeout(Duration::from_secs(1), rig.exited.notified())
            .await
            .expect("shutdown after exhaustion");

        assert_eq!(*rig.codes.lock().unwrap(), vec![1]);
        assert_eq!(rig.hook.faults(), vec![Some(RuntimeError::PoolExhausted)]);
        assert!(rig.sup.registry().is_empty().await);
    }

    #[tokio::test]
    async fn exhaustion_of_single_worker_pool_shuts_down_once() {
        exhaustion_case(1).await;
    }

    #[tokio::test]
    async fn exhaustion_of_four_worker_pool_shuts_down_once() {
        exhaustion_case(4).await;
    }

    #[tokio::test]
    async fn exit_removes_only_the_matching_handle() {
        let rig = rig(3, true, None);
        rig.sup.clone().start().await.expect("start");

        rig.sup
            .bus()
            .publish(Event::new(EventKind::WorkerExited).with_worker(2).with_code(1));

        let registry = Arc::clone(rig.sup.registry());
        eventually("removal of worker 2", move || {
            let registry = Arc::clone(&registry);
            async move { registry.len().await == 2 }
        })
        .await;

        assert_eq!(rig.sup.registry().ids().await, vec![1, 3]);
        assert!(rig.codes.lock().unwrap().is_empty(), "no shutdown expected");
    }

    #[tokio::test]
    async fn master_fault_is_caught_and_escalates() {
        let master: RoutineRef =
            RoutineFn::arc(|_sup: Arc<Supervisor>| async move { Err(RoutineError::fail("boom")) });
        let rig = rig(1, true, Some(master));

        rig.sup.clone().start().await.expect("fault stays inside the boundary");

        timeout(Duration::from_secs(1), rig.exited.notified())
            .await
            .expect("fatal shutdown");
        assert_eq!(*rig.codes.lock().unwrap(), vec![1]);
        assert_eq!(
            rig.hook.faults(),
            vec![Some(RuntimeError::MasterFault(RoutineError::Fail {
                error: "boom".to_string()
            }))]
        );
    }

    #[tokio::test]
    async fn master_panic_is_caught_by_the_boundary() {
        let master: RoutineRef =
            RoutineFn::arc(|_sup: Arc<Supervisor>| async move { panic!("master blew up") });
        let rig = rig(1, true, Some(master));

        rig.sup.clone().start().await.expect("panic stays inside the boundary");

        timeout(Duration::from_secs(1), rig.exited.notified())
            .await
            .expect("fatal shutdown");
        match rig.hook.faults().as_slice() {
            [Some(RuntimeError::MasterFault(RoutineError::Panicked { info }))] => {
                assert_eq!(info, "master blew up");
            }
            other => panic!("unexpected hook faults: {other:?}"),
        }
    }

    #[tokio::test]
    async fn kill_on_error_disabled_logs_but_never_exits() {
        let master: RoutineRef =
            RoutineFn::arc(|_sup: Arc<Supervisor>| async move { Err(RoutineError::fail("boom")) });
        let rig = rig(1, false, Some(master));

        rig.sup.clone().start().await.expect("start");
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(rig.codes.lock().unwrap().is_empty());
        assert!(rig.hook.faults().is_empty());
        assert_eq!(rig.sup.registry().len().await, 1, "pool keeps running");
    }

    #[tokio::test]
    async fn worker_fault_kills_only_that_worker() {
        let rig = rig(2, true, None);
        rig.sup.clone().start().await.expect("start");

        rig.host.fault(1, RoutineError::fail("worker blew up"));

        let host = Arc::clone(&rig.host);
        eventually("worker 1 killed with non-zero status", move || {
            let host = Arc::clone(&host);
            async move { host.kills() == vec![(1, 1)] }
        })
        .await;

        assert_eq!(rig.sup.registry().len().await, 2);
        assert!(rig.codes.lock().unwrap().is_empty(), "master must survive");
    }

    #[tokio::test]
    async fn listening_signal_is_informational_only() {
        let rig = rig(1, true, None);
        rig.sup.clone().start().await.expect("start");

        rig.sup.bus().publish(
            Event::new(EventKind::WorkerListening)
                .with_worker(1)
                .with_address(crate::process::BoundAddress {
                    address: "0.0.0.0".to_string(),
                    port: "9000".to_string(),
                }),
        );
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(rig.sup.registry().len().await, 1);
        assert!(rig.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn worker_role_announces_online_and_runs_routine() {
        let ran = Arc::new(Mutex::new(false));
        let ran_in = Arc::clone(&ran);
        let worker: RoutineRef = RoutineFn::arc(move |_sup: Arc<Supervisor>| {
            let ran = Arc::clone(&ran_in);
            async move {
                *ran.lock().unwrap() = true;
                Ok(())
            }
        });

        let host = SimHost::worker();
        let sup = SupervisorBuilder::from_worker(worker)
            .with_host(host.clone())
            .with_env_overrides(EnvOverrides::default())
            .build()
            .expect("build");

        sup.clone().start().await.expect("worker start");

        assert!(*ran.lock().unwrap());
        assert_eq!(*host.announced.lock().unwrap(), vec![WorkerSignal::Online]);
        assert!(sup.registry().is_empty().await, "no pool in a worker process");
    }

    #[tokio::test]
    async fn worker_routine_fault_propagates_unboundaried() {
        let worker: RoutineRef =
            RoutineFn::arc(|_sup: Arc<Supervisor>| async move { Err(RoutineError::fail("die")) });
        let sup = SupervisorBuilder::from_worker(worker)
            .with_host(SimHost::worker())
            .with_env_overrides(EnvOverrides::default())
            .build()
            .expect("build");

        let err = sup.clone().start().await.unwrap_err();
        assert_eq!(
            err,
            RuntimeError::WorkerFault(RoutineError::Fail {
                error: "die".to_string()
            })
        );
    }
}
