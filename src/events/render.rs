//! Canonical log lines for lifecycle moments.
//!
//! One pure function per logged moment, shared by the dispatcher (tracing
//! output) and the `LogWriter` demo subscriber so the wording stays in one
//! place.

use crate::error::RuntimeError;
use crate::process::{BoundAddress, ExitStatus, WorkerId};

pub(crate) fn created(id: WorkerId) -> String {
    format!("Worker created: {id}")
}

pub(crate) fn forked(id: WorkerId) -> String {
    format!("Worker forked: {id}")
}

pub(crate) fn online(id: WorkerId) -> String {
    format!("Worker online: {id}")
}

pub(crate) fn listening(id: WorkerId, address: &BoundAddress) -> String {
    format!("Worker listening: {id} on address {address}")
}

pub(crate) fn disconnected(id: WorkerId) -> String {
    format!("Worker disconnected: {id}")
}

pub(crate) fn exited(id: WorkerId, status: &ExitStatus) -> String {
    let code = match status.code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    };
    let signal = status.signal.as_deref().unwrap_or("none");
    format!("Worker exited: {id} code={code} signal={signal}")
}

pub(crate) fn worker_fault(id: WorkerId, reason: &str) -> String {
    format!("Uncaught worker fault: {id}: {reason}")
}

pub(crate) fn master_fault(reason: &str) -> String {
    format!("Uncaught master fault: {reason}")
}

pub(crate) fn master_fatal() -> String {
    "Master fault is fatal, exiting".to_string()
}

pub(crate) fn pool_exhausted() -> String {
    RuntimeError::PoolExhausted.to_string()
}

pub(crate) fn workers_defaulted(count: usize) -> String {
    format!("No worker count configured, defaulting to {count}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listening_line_matches_wire_format() {
        let addr = BoundAddress {
            address: "0.0.0.0".to_string(),
            port: "9000".to_string(),
        };
        assert_eq!(
            listening(3, &addr),
            "Worker listening: 3 on address 0.0.0.0:9000"
        );
    }

    #[test]
    fn exited_line_covers_missing_fields() {
        let by_code = ExitStatus {
            code: Some(1),
            signal: None,
        };
        assert_eq!(exited(2, &by_code), "Worker exited: 2 code=1 signal=none");

        let by_signal = ExitStatus {
            code: None,
            signal: Some("SIGKILL".to_string()),
        };
        assert_eq!(
            exited(2, &by_signal),
            "Worker exited: 2 code=none signal=SIGKILL"
        );
    }

    #[test]
    fn exhaustion_line_is_the_fault_message() {
        assert_eq!(pool_exhausted(), "all workers have died");
    }
}
