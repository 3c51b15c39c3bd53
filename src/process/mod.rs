//! Process-spawning seam: worker handles and the host abstraction.
//!
//! The underlying forking primitive is an external collaborator, so it lives
//! behind the [`ProcessHost`] trait:
//! - `role()` — is this process the controlling master or a spawned worker;
//! - `fork()` — spawn a child, returning its [`WorkerHandle`] synchronously
//!   together with the [`FaultSignal`] used to install the worker's fault
//!   boundary;
//! - `announce()` — worker-side upcall reporting `online`/`listening` to the
//!   master.
//!
//! [`LocalHost`] is the default implementation: it re-executes the current
//! binary and carries lifecycle signals over a newline-delimited JSON control
//! channel on the child's stdout.

mod handle;
mod host;
mod local;

pub use handle::{BoundAddress, ExitStatus, FaultSignal, Forked, WorkerHandle, WorkerId, WorkerProcess};
pub use host::{ProcessHost, Role, WorkerSignal};
pub use local::{LocalHost, WORKER_ID_ENV};
