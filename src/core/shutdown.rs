//! # Shutdown coordinator.
//!
//! [`ExitCoordinator::exit`] is the single path out of the process:
//!
//! 1. run the configured pre-exit hook to completion with the triggering
//!    fault (the hook may be asynchronous; there is no timeout, so a hung
//!    hook hangs the exit);
//! 2. cancel the runtime token, tearing down the lifecycle listener and the
//!    worker boundary guards;
//! 3. terminate with status 1 if a fault was supplied, 0 otherwise.
//!
//! The terminator is injectable so the protocol is observable in-process;
//! the default is [`std::process::exit`].

use tokio_util::sync::CancellationToken;

use crate::error::RuntimeError;
use crate::routines::ExitHookRef;

/// Final process-termination step.
pub type Terminator = Box<dyn Fn(i32) + Send + Sync>;

/// Executes the pre-exit protocol and terminates the process.
pub struct ExitCoordinator {
    hook: ExitHookRef,
    runtime: CancellationToken,
    terminator: Terminator,
}

impl ExitCoordinator {
    /// Creates a coordinator over the given hook, runtime token and
    /// terminator.
    pub fn new(hook: ExitHookRef, runtime: CancellationToken, terminator: Terminator) -> Self {
        Self {
            hook,
            runtime,
            terminator,
        }
    }

    /// Runs the pre-exit hook, then terminates with the fault-derived status.
    ///
    /// Exit never races ahead of the hook: the terminator fires only after
    /// the hook's future resolves.
    pub async fn exit(&self, fault: Option<RuntimeError>) {
        self.hook.run(fault.as_ref()).await;
        self.runtime.cancel();
        let code = i32::from(fault.is_some());
        (self.terminator)(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::routines::ExitHook;

    /// Journals hook and terminator invocations in order.
    struct JournalingHook {
        journal: Arc<Mutex<Vec<String>>>,
        faults: Arc<Mutex<Vec<Option<RuntimeError>>>>,
    }

    #[async_trait]
    impl ExitHook for JournalingHook {
        async fn run(&self, fault: Option<&RuntimeError>) {
            tokio::task::yield_now().await;
            self.faults.lock().unwrap().push(fault.cloned());
            self.journal.lock().unwrap().push("hook".to_string());
        }
    }

    fn coordinator(
        journal: Arc<Mutex<Vec<String>>>,
        faults: Arc<Mutex<Vec<Option<RuntimeError>>>>,
    ) -> ExitCoordinator {
        let hook = Arc::new(JournalingHook {
            journal: journal.clone(),
            faults,
        });
        let journal_term = journal;
        ExitCoordinator::new(
            hook,
            CancellationToken::new(),
            Box::new(move |code| journal_term.lock().unwrap().push(format!("exit:{code}"))),
        )
    }

    #[tokio::test]
    async fn fault_exit_runs_hook_once_then_status_one() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let faults = Arc::new(Mutex::new(Vec::new()));
        let coord = coordinator(journal.clone(), faults.clone());

        let fault = RuntimeError::MasterFault(crate::RoutineError::fail("boom"));
        coord.exit(Some(fault.clone())).await;

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["hook".to_string(), "exit:1".to_string()]
        );
        assert_eq!(*faults.lock().unwrap(), vec![Some(fault)]);
    }

    #[tokio::test]
    async fn clean_exit_terminates_with_status_zero() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let faults = Arc::new(Mutex::new(Vec::new()));
        let coord = coordinator(journal.clone(), faults.clone());

        coord.exit(None).await;

        assert_eq!(
            *journal.lock().unwrap(),
            vec!["hook".to_string(), "exit:0".to_string()]
        );
        assert_eq!(*faults.lock().unwrap(), vec![None]);
    }
}
