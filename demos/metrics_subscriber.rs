//! # Example: metrics_subscriber
//!
//! Shows the passive observation surface: a [`Subscribe`] implementation
//! counting worker create/exit events, plus a pre-exit hook that reports the
//! final counters and the triggering fault right before the process
//! terminates.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example metrics_subscriber --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use clustervisor::{
    Config, Event, EventKind, ExitHookFn, Role, RoutineFn, RuntimeError, Subscribe, Supervisor,
    SupervisorBuilder,
};

/// Counts pool churn; in real life you would export these counters.
#[derive(Default)]
struct PoolMetrics {
    created: AtomicUsize,
    exited: AtomicUsize,
}

#[async_trait]
impl Subscribe for PoolMetrics {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::WorkerCreated => {
                self.created.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::WorkerExited => {
                self.exited.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "pool-metrics"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    clustervisor::logging::init();

    let metrics = Arc::new(PoolMetrics::default());
    let metrics_for_hook = Arc::clone(&metrics);

    let cfg = Config {
        num_workers: Some(3),
        debug_scope: Some("metrics".to_string()),
        ..Config::default()
    };

    let sup = SupervisorBuilder::new(cfg)
        .with_worker(RoutineFn::arc(|_sup: Arc<Supervisor>| async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }))
        .with_subscribers(vec![metrics.clone() as Arc<dyn Subscribe>])
        .with_before_exit(ExitHookFn::arc(move |fault: Option<RuntimeError>| {
            let metrics = Arc::clone(&metrics_for_hook);
            async move {
                println!(
                    "shutting down: created={} exited={} fault={}",
                    metrics.created.load(Ordering::Relaxed),
                    metrics.exited.load(Ordering::Relaxed),
                    fault.map_or_else(|| "none".to_string(), |f| f.as_label().to_string()),
                );
            }
        }))
        .build()?;

    let role = sup.role();
    Arc::clone(&sup).start().await?;

    if role == Role::Master {
        futures::future::pending::<()>().await;
    }
    Ok(())
}
