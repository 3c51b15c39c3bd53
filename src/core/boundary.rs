//! # Fault boundaries.
//!
//! Each supervised entity gets exactly one explicit result-or-fault boundary:
//!
//! - [`supervised`] wraps the master's run (initial pool spawn + master
//!   routine) and converts a returned error **or a panic** into a
//!   [`RoutineError`] for the master-error handler.
//! - [`guard_worker`] is the per-handle boundary installed at the spawn
//!   point: the first fault surfacing through the handle's [`FaultSignal`] is
//!   logged with its diagnostic detail and the worker is unconditionally
//!   killed with a non-zero status. A worker fault never propagates to the
//!   master.
//!
//! There is no global exception interception anywhere: both boundaries are
//! visible at the point the task they guard is spawned.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::RoutineError;
use crate::events::{render, Bus, Event, EventKind};
use crate::logging;
use crate::process::{FaultSignal, WorkerHandle};

/// Runs `fut` inside a fault boundary, capturing errors and panics.
pub(crate) async fn supervised<F>(fut: F) -> Result<(), RoutineError>
where
    F: Future<Output = Result<(), RoutineError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => Err(RoutineError::Panicked {
            info: panic_message(&*panic),
        }),
    }
}

/// Installs the fault boundary for one worker handle.
///
/// Lives from handle creation until the handle's fault channel closes or the
/// runtime is torn down.
pub(crate) fn guard_worker(
    handle: WorkerHandle,
    faults: FaultSignal,
    scope: Arc<str>,
    bus: Bus,
    runtime: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let fault = tokio::select! {
            res = faults => match res {
                Ok(fault) => fault,
                // Channel closed without a fault: the worker ended cleanly
                // from the boundary's point of view.
                Err(_) => return,
            },
            _ = runtime.cancelled() => return,
        };

        let detail = fault.to_string();
        logging::error(&scope, &render::worker_fault(handle.id(), &detail));
        bus.publish(
            Event::new(EventKind::WorkerFaulted)
                .with_worker(handle.id())
                .with_reason(detail),
        );
        handle.kill(1);
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn supervised_passes_through_success() {
        assert_eq!(supervised(async { Ok(()) }).await, Ok(()));
    }

    #[tokio::test]
    async fn supervised_captures_errors() {
        let res = supervised(async { Err(RoutineError::fail("boom")) }).await;
        assert_eq!(
            res,
            Err(RoutineError::Fail {
                error: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn supervised_captures_panics() {
        let res = supervised(async { panic!("kaboom") }).await;
        match res {
            Err(RoutineError::Panicked { info }) => assert_eq!(info, "kaboom"),
            other => panic!("expected panic capture, got {other:?}"),
        }
    }
}
