//! # Example: basic_pool
//!
//! Spawns a pool of two real worker processes (the demo binary re-executes
//! itself), each of which announces `online` and `listening`, works for two
//! seconds and exits. When the last worker is gone the pool is exhausted and
//! the master terminates with status 1.
//!
//! ## Flow
//! ```text
//! master: start()
//!   ├─► create_worker() × 2          (re-exec with CLUSTERVISOR_WORKER_ID)
//!   ├─► master routine prints pool size
//!   ├─◄ online / listening signals over the stdout control channel
//!   ├─◄ exit signals as the workers finish
//!   └─► "all workers have died" → exit(1)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example basic_pool --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use clustervisor::{
    BoundAddress, Config, Role, RoutineFn, Supervisor, SupervisorBuilder, WorkerSignal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    clustervisor::logging::init();

    let cfg = Config {
        num_workers: Some(2),
        debug_scope: Some("basic-pool".to_string()),
        ..Config::default()
    };

    let sup = SupervisorBuilder::new(cfg)
        .with_worker(RoutineFn::arc(|sup: Arc<Supervisor>| async move {
            sup.announce(WorkerSignal::Listening(BoundAddress {
                address: "0.0.0.0".to_string(),
                port: "9000".to_string(),
            }));
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        }))
        .with_master(RoutineFn::arc(|sup: Arc<Supervisor>| async move {
            println!("master: pool of {} workers is up", sup.registry().len().await);
            Ok(())
        }))
        .build()?;

    let role = sup.role();
    Arc::clone(&sup).start().await?;

    if role == Role::Master {
        // Supervision continues on background tasks; pool exhaustion ends the
        // process through the exit coordinator.
        futures::future::pending::<()>().await;
    }
    Ok(())
}
