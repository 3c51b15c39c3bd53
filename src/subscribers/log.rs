//! # LogWriter — simple event printer.
//!
//! A minimal subscriber that prints the canonical line for each event to
//! stdout. Use it for demos and tests; production deployments log through the
//! `tracing` output the core already emits.

use async_trait::async_trait;

use crate::events::{render, Event, EventKind};
use crate::process::{BoundAddress, ExitStatus};
use crate::subscribers::Subscribe;

/// Canonical-line event printer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let id = e.worker.unwrap_or(0);
        let line = match e.kind {
            EventKind::WorkerCreated => render::created(id),
            EventKind::WorkerForked => render::forked(id),
            EventKind::WorkerOnline => render::online(id),
            EventKind::WorkerListening => {
                render::listening(id, e.address.as_ref().unwrap_or(&BoundAddress::default()))
            }
            EventKind::WorkerDisconnected => render::disconnected(id),
            EventKind::WorkerExited => render::exited(
                id,
                &ExitStatus {
                    code: e.code,
                    signal: e.signal.as_deref().map(str::to_string),
                },
            ),
            EventKind::WorkerFaulted => {
                render::worker_fault(id, e.reason.as_deref().unwrap_or("unknown"))
            }
            EventKind::MasterFaulted => {
                render::master_fault(e.reason.as_deref().unwrap_or("unknown"))
            }
            EventKind::PoolExhausted => render::pool_exhausted(),
        };
        println!("[{}] {line}", e.seq);
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
