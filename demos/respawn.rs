//! # Example: respawn
//!
//! Demonstrates the standard lifecycle extension mechanism: wrap the default
//! [`Dispatcher`] in a specialized [`Lifecycle`] that replaces every exited
//! worker before running the standard exit handling, so the registry never
//! reaches zero and the pool lives forever.
//!
//! ## Flow
//! ```text
//! worker exits
//!   └─► Respawning::exit
//!         ├─► inner.create_worker()      (replacement enters the registry)
//!         └─► inner.exit(worker, status) (removal; pool never empties)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example respawn --features logging
//! ```
//! Stop it with Ctrl-C; respawning is endless by design.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clustervisor::{
    BoundAddress, Config, Dispatcher, ExitStatus, Lifecycle, Role, RoutineFn, RuntimeError,
    Supervisor, SupervisorBuilder, WorkerHandle, WorkerId,
};

/// Lifecycle wrapper that replaces every exited worker.
struct Respawning {
    inner: Arc<Dispatcher>,
}

#[async_trait]
impl Lifecycle for Respawning {
    async fn create_worker(&self) -> Result<WorkerHandle, RuntimeError> {
        self.inner.create_worker().await
    }

    async fn fork(&self, worker: WorkerId) {
        self.inner.fork(worker).await;
    }

    async fn online(&self, worker: WorkerId) {
        self.inner.online(worker).await;
    }

    async fn listening(&self, worker: WorkerId, address: BoundAddress) {
        self.inner.listening(worker, address).await;
    }

    async fn disconnect(&self, worker: WorkerId) {
        self.inner.disconnect(worker).await;
    }

    async fn exit(&self, worker: WorkerId, status: ExitStatus) {
        if let Err(err) = self.inner.create_worker().await {
            eprintln!("respawn failed: {err}");
        }
        self.inner.exit(worker, status).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    clustervisor::logging::init();

    let cfg = Config {
        num_workers: Some(2),
        debug_scope: Some("respawn".to_string()),
        ..Config::default()
    };

    let sup = SupervisorBuilder::new(cfg)
        .with_worker(RoutineFn::arc(|_sup: Arc<Supervisor>| async move {
            // Short-lived on purpose, to exercise the respawn path.
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }))
        .decorate_lifecycle(|inner| Arc::new(Respawning { inner }))
        .build()?;

    let role = sup.role();
    Arc::clone(&sup).start().await?;

    if role == Role::Master {
        futures::future::pending::<()>().await;
    }
    Ok(())
}
