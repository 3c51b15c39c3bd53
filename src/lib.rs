//! # clustervisor
//!
//! **Clustervisor** is a master/worker process supervision library for Rust.
//!
//! A single control process (the master) spawns a pool of worker processes,
//! keeps the books on their lifecycle signals, isolates faults per entity,
//! and terminates the whole group when the pool is exhausted or an
//! unrecoverable master-side fault occurs.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐      ┌──────────────┐      ┌──────────────┐
//!     │  worker proc │      │  worker proc │      │  worker proc │
//!     │ (routine #1) │      │ (routine #2) │      │ (routine #N) │
//!     └──────┬───────┘      └──────┬───────┘      └──────┬───────┘
//!            │  fork/online/listening/disconnect/exit    │
//!            ▼                     ▼                     ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ProcessHost (LocalHost: re-exec + stdout control channel)        │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼
//!                      Bus (broadcast events)
//!                                │
//! ┌──────────────────────────────┴────────────────────────────────────┐
//! │  Supervisor (master process)                                      │
//! │  - lifecycle listener: SubscriberSet fan-out + Lifecycle dispatch │
//! │  - Registry (ordered live worker handles)                         │
//! │  - fault boundaries: supervised(master), guard per worker         │
//! │  - ExitCoordinator (pre-exit hook → status 0/1)                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//! start() ── master role:
//!   ├─► spawn lifecycle listener
//!   ├─► create_worker() × num_workers        (registry fully populated)
//!   ├─► master routine(Arc<Supervisor>)      (inside the fault boundary)
//!   │
//!   ├─ worker exit signal ─► registry removal ─► empty? ─► exit(status 1)
//!   ├─ worker fault ─► log + kill(1)          (never reaches the master)
//!   └─ master fault ─► master_error()
//!        ├─ kill_on_error = true  ─► pre-exit hook ─► exit(status 1)
//!        └─ kill_on_error = false ─► logged, master keeps running
//!
//! start() ── worker role:
//!   └─► announce(online) ─► worker routine(Arc<Supervisor>)
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key types / traits                     |
//! |-----------------|-----------------------------------------------------------|----------------------------------------|
//! | **Supervision** | Pool spawning, signal dispatch, exhaustion detection.     | [`Supervisor`], [`Lifecycle`]          |
//! | **Routines**    | Operator code run in worker/master context.               | [`Routine`], [`RoutineFn`]             |
//! | **Processes**   | Spawning seam and worker handles.                         | [`ProcessHost`], [`WorkerHandle`]      |
//! | **Events**      | Broadcast lifecycle events, subscriber fan-out.           | [`Event`], [`Bus`], [`Subscribe`]      |
//! | **Shutdown**    | Pre-exit hook, fault-derived exit status.                 | [`ExitHook`], [`ExitCoordinator`]      |
//! | **Errors**      | Typed runtime and routine faults.                         | [`RuntimeError`], [`RoutineError`]     |
//!
//! ## Optional features
//! - `logging`: exports [`logging::init`] (a `tracing-subscriber` bootstrap)
//!   and the [`LogWriter`] demo subscriber.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use clustervisor::{Config, RoutineFn, Supervisor, SupervisorBuilder};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.num_workers = Some(4);
//!
//!     let sup = SupervisorBuilder::new(cfg)
//!         .with_worker(RoutineFn::arc(|_sup: Arc<Supervisor>| async move {
//!             // runs in each worker process
//!             loop {
//!                 tokio::time::sleep(Duration::from_secs(1)).await;
//!             }
//!         }))
//!         .with_master(RoutineFn::arc(|sup: Arc<Supervisor>| async move {
//!             println!("pool of {} workers is up", sup.registry().len().await);
//!             Ok(())
//!         }))
//!         .build()?;
//!
//!     Arc::clone(&sup).start().await?;
//!     // keep the master alive; supervision continues on background tasks
//!     futures::future::pending::<()>().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
pub mod logging;
mod process;
mod routines;
mod subscribers;

#[cfg(test)]
pub(crate) mod testing;

// ---- Public re-exports ----

pub use config::{Config, EnvOverrides, ResolvedConfig, DEFAULT_SCOPE, SCOPE_ENV, WORKERS_ENV};
pub use core::{Dispatcher, ExitCoordinator, Lifecycle, Registry, Supervisor, SupervisorBuilder, Terminator};
pub use error::{RoutineError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use process::{
    BoundAddress, ExitStatus, FaultSignal, Forked, LocalHost, ProcessHost, Role, WorkerHandle,
    WorkerId, WorkerProcess, WorkerSignal, WORKER_ID_ENV,
};
pub use routines::{ExitHook, ExitHookFn, ExitHookRef, Routine, RoutineFn, RoutineRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
