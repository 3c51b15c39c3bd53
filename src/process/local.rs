//! # LocalHost: default process host backed by `tokio::process`.
//!
//! Forking model: the master re-executes its own binary
//! (`std::env::current_exe()`) with [`WORKER_ID_ENV`] set; the presence of
//! that variable is what makes the child report [`Role::Worker`].
//!
//! ## Control channel
//! A worker's stdout is the control channel back to its master: one JSON
//! object per line.
//! ```text
//! {"signal":"online"}
//! {"signal":"listening","address":"0.0.0.0","port":"9000"}
//! ```
//! A monitor task per child translates control lines into `WorkerOnline` /
//! `WorkerListening` events, publishes `WorkerDisconnected` when the channel
//! closes, and `WorkerExited` (status code plus unix signal name) once the
//! process is reaped. Malformed control traffic surfaces through the handle's
//! [`FaultSignal`].
//!
//! ## Kill path
//! [`WorkerHandle::kill`] forwards over a channel to the monitor, which calls
//! [`Child::start_kill`]; no acknowledgement is awaited. The requested status
//! is advisory: local children die by signal.
//!
//! [`FaultSignal`]: crate::process::FaultSignal
//! [`WorkerHandle::kill`]: crate::process::WorkerHandle::kill
//! [`Child::start_kill`]: tokio::process::Child::start_kill

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};

use crate::error::{RoutineError, RuntimeError};
use crate::events::{Bus, Event, EventKind};
use crate::process::handle::{BoundAddress, Forked, WorkerHandle, WorkerId, WorkerProcess};
use crate::process::host::{ProcessHost, Role, WorkerSignal};

/// Set in a child's environment to mark it as a worker and carry its id.
pub const WORKER_ID_ENV: &str = "CLUSTERVISOR_WORKER_ID";

/// Control message carried over a worker's stdout, one JSON object per line.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub(crate) enum ControlMessage {
    Online,
    Listening { address: String, port: String },
}

impl From<WorkerSignal> for ControlMessage {
    fn from(signal: WorkerSignal) -> Self {
        match signal {
            WorkerSignal::Online => ControlMessage::Online,
            WorkerSignal::Listening(addr) => ControlMessage::Listening {
                address: addr.address,
                port: addr.port,
            },
        }
    }
}

/// Default [`ProcessHost`] spawning workers by re-executing the current
/// binary.
pub struct LocalHost {
    program: PathBuf,
    role: Role,
    next_id: AtomicU64,
}

impl LocalHost {
    /// Captures the current executable path and the process role.
    ///
    /// Role detection happens here, once; nothing else in the host reads the
    /// environment.
    pub fn new() -> std::io::Result<Self> {
        let role = if std::env::var_os(WORKER_ID_ENV).is_some() {
            Role::Worker
        } else {
            Role::Master
        };
        Ok(Self {
            program: std::env::current_exe()?,
            role,
            next_id: AtomicU64::new(0),
        })
    }
}

impl ProcessHost for LocalHost {
    fn role(&self) -> Role {
        self.role
    }

    fn fork(&self, bus: Bus) -> Result<Forked, RuntimeError> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;

        let mut cmd = Command::new(&self.program);
        cmd.env(WORKER_ID_ENV, id.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| RuntimeError::Spawn {
            reason: e.to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| RuntimeError::Spawn {
            reason: "worker stdout unavailable".to_string(),
        })?;

        let (kill_tx, kill_rx) = mpsc::unbounded_channel();
        let (fault_tx, fault_rx) = oneshot::channel();

        bus.publish(Event::new(EventKind::WorkerForked).with_worker(id));
        tokio::spawn(monitor(id, child, stdout, kill_rx, fault_tx, bus));

        Ok(Forked {
            handle: WorkerHandle::new(id, Arc::new(LocalProcess { kill: kill_tx })),
            faults: fault_rx,
        })
    }

    fn announce(&self, signal: WorkerSignal) {
        if self.role != Role::Worker {
            return;
        }
        let msg = ControlMessage::from(signal);
        if let Ok(json) = serde_json::to_string(&msg) {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let _ = writeln!(out, "{json}");
            let _ = out.flush();
        }
    }
}

/// Kill capability of a locally spawned child.
struct LocalProcess {
    kill: mpsc::UnboundedSender<i32>,
}

impl WorkerProcess for LocalProcess {
    fn kill(&self, code: i32) {
        let _ = self.kill.send(code);
    }
}

/// Reads the control channel, forwards kill requests, reaps the child.
async fn monitor(
    id: WorkerId,
    mut child: Child,
    stdout: ChildStdout,
    mut kill_rx: mpsc::UnboundedReceiver<i32>,
    fault_tx: oneshot::Sender<RoutineError>,
    bus: Bus,
) {
    let mut fault_tx = Some(fault_tx);
    let mut lines = BufReader::new(stdout).lines();

    loop {
        tokio::select! {
            maybe = lines.next_line() => match maybe {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ControlMessage>(line) {
                        Ok(ControlMessage::Online) => {
                            bus.publish(Event::new(EventKind::WorkerOnline).with_worker(id));
                        }
                        Ok(ControlMessage::Listening { address, port }) => {
                            bus.publish(
                                Event::new(EventKind::WorkerListening)
                                    .with_worker(id)
                                    .with_address(BoundAddress { address, port }),
                            );
                        }
                        Err(err) => raise_fault(
                            &mut fault_tx,
                            RoutineError::fail(format!("malformed control line: {err}")),
                        ),
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    raise_fault(
                        &mut fault_tx,
                        RoutineError::fail(format!("control channel error: {err}")),
                    );
                    break;
                }
            },
            Some(_status) = kill_rx.recv() => {
                let _ = child.start_kill();
            }
        }
    }

    bus.publish(Event::new(EventKind::WorkerDisconnected).with_worker(id));

    let status = loop {
        tokio::select! {
            res = child.wait() => break res,
            Some(_status) = kill_rx.recv() => {}
        }
        let _ = child.start_kill();
    };

    let mut ev = Event::new(EventKind::WorkerExited).with_worker(id);
    if let Ok(status) = status {
        if let Some(code) = status.code() {
            ev = ev.with_code(code);
        }
        if let Some(name) = signal_name_of(&status) {
            ev = ev.with_signal(name);
        }
    }
    bus.publish(ev);
}

fn raise_fault(slot: &mut Option<oneshot::Sender<RoutineError>>, fault: RoutineError) {
    if let Some(tx) = slot.take() {
        let _ = tx.send(fault);
    }
}

#[cfg(unix)]
fn signal_name_of(status: &std::process::ExitStatus) -> Option<String> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(signal_name)
}

#[cfg(not(unix))]
fn signal_name_of(_status: &std::process::ExitStatus) -> Option<String> {
    None
}

#[cfg(unix)]
fn signal_name(n: i32) -> String {
    match n {
        1 => "SIGHUP".to_string(),
        2 => "SIGINT".to_string(),
        3 => "SIGQUIT".to_string(),
        6 => "SIGABRT".to_string(),
        9 => "SIGKILL".to_string(),
        11 => "SIGSEGV".to_string(),
        13 => "SIGPIPE".to_string(),
        15 => "SIGTERM".to_string(),
        n => format!("signal {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_messages_round_trip() {
        let online = serde_json::to_string(&ControlMessage::Online).unwrap();
        assert_eq!(online, r#"{"signal":"online"}"#);
        assert_eq!(
            serde_json::from_str::<ControlMessage>(&online).unwrap(),
            ControlMessage::Online
        );

        let listening = ControlMessage::from(WorkerSignal::Listening(BoundAddress {
            address: "0.0.0.0".to_string(),
            port: "9000".to_string(),
        }));
        let json = serde_json::to_string(&listening).unwrap();
        let back: ControlMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, listening);
    }

    #[test]
    fn malformed_control_line_is_rejected() {
        assert!(serde_json::from_str::<ControlMessage>("{\"signal\":\"reboot\"}").is_err());
        assert!(serde_json::from_str::<ControlMessage>("not json").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn common_signals_have_names() {
        assert_eq!(signal_name(15), "SIGTERM");
        assert_eq!(signal_name(9), "SIGKILL");
        assert_eq!(signal_name(64), "signal 64");
    }
}
