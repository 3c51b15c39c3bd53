//! In-memory doubles for exercising the supervision core without real
//! processes: a simulated process host, recording exit hook/terminator, and a
//! small polling helper for event-loop assertions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{oneshot, Notify};

use crate::core::Terminator;
use crate::error::{RoutineError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::process::{Forked, ProcessHost, Role, WorkerHandle, WorkerId, WorkerProcess, WorkerSignal};
use crate::routines::ExitHook;

/// Simulated process host: forks produce inert handles, lifecycle signals are
/// injected by tests through the bus, faults through [`SimHost::fault`].
pub(crate) struct SimHost {
    role: Role,
    next_id: AtomicU64,
    pub kills: Arc<Mutex<Vec<(WorkerId, i32)>>>,
    faults: Mutex<HashMap<WorkerId, oneshot::Sender<RoutineError>>>,
    pub announced: Mutex<Vec<WorkerSignal>>,
}

impl SimHost {
    pub fn master() -> Arc<Self> {
        Arc::new(Self {
            role: Role::Master,
            next_id: AtomicU64::new(0),
            kills: Arc::new(Mutex::new(Vec::new())),
            faults: Mutex::new(HashMap::new()),
            announced: Mutex::new(Vec::new()),
        })
    }

    pub fn worker() -> Arc<Self> {
        Arc::new(Self {
            role: Role::Worker,
            next_id: AtomicU64::new(0),
            kills: Arc::new(Mutex::new(Vec::new())),
            faults: Mutex::new(HashMap::new()),
            announced: Mutex::new(Vec::new()),
        })
    }

    /// Surfaces a fault through the given worker's boundary channel.
    pub fn fault(&self, id: WorkerId, fault: RoutineError) {
        if let Some(tx) = self.faults.lock().unwrap().remove(&id) {
            let _ = tx.send(fault);
        }
    }

    pub fn kills(&self) -> Vec<(WorkerId, i32)> {
        self.kills.lock().unwrap().clone()
    }
}

impl ProcessHost for SimHost {
    fn role(&self) -> Role {
        self.role
    }

    fn fork(&self, bus: Bus) -> Result<Forked, RuntimeError> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        let (fault_tx, fault_rx) = oneshot::channel();
        self.faults.lock().unwrap().insert(id, fault_tx);

        bus.publish(Event::new(EventKind::WorkerForked).with_worker(id));

        let proc = Arc::new(SimProcess {
            id,
            kills: Arc::clone(&self.kills),
        });
        Ok(Forked {
            handle: WorkerHandle::new(id, proc),
            faults: fault_rx,
        })
    }

    fn announce(&self, signal: WorkerSignal) {
        self.announced.lock().unwrap().push(signal);
    }
}

struct SimProcess {
    id: WorkerId,
    kills: Arc<Mutex<Vec<(WorkerId, i32)>>>,
}

impl WorkerProcess for SimProcess {
    fn kill(&self, code: i32) {
        self.kills.lock().unwrap().push((self.id, code));
    }
}

/// Records the faults the pre-exit hook was invoked with.
pub(crate) struct RecordingHook {
    pub faults: Mutex<Vec<Option<RuntimeError>>>,
}

impl RecordingHook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            faults: Mutex::new(Vec::new()),
        })
    }

    pub fn faults(&self) -> Vec<Option<RuntimeError>> {
        self.faults.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ExitHook for RecordingHook {
    async fn run(&self, fault: Option<&RuntimeError>) {
        self.faults.lock().unwrap().push(fault.cloned());
    }
}

/// Terminator that records exit codes and pings a notify.
pub(crate) fn recording_terminator(codes: Arc<Mutex<Vec<i32>>>, notify: Arc<Notify>) -> Terminator {
    Box::new(move |code| {
        codes.lock().unwrap().push(code);
        notify.notify_one();
    })
}

/// Polls an async condition until it holds, for up to one second.
pub(crate) async fn eventually<F, Fut>(what: &str, mut cond: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if cond().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 1s: {what}");
}
