//! Supervision core: orchestration and lifecycle.
//!
//! This module contains the runtime that owns the worker pool. The public
//! surface is [`Supervisor`] (role dispatch, master startup, error
//! escalation), [`SupervisorBuilder`] (wiring), the [`Lifecycle`] trait with
//! its default [`Dispatcher`] (signal handling + registry maintenance), the
//! [`Registry`] itself, and the [`ExitCoordinator`] shutdown protocol.
//!
//! Internal modules:
//! - [`boundary`]: explicit per-entity fault boundaries (master + per worker);
//! - [`dispatcher`]: the five signal handlers plus worker creation;
//! - [`registry`]: ordered live set of worker handles;
//! - [`shutdown`]: pre-exit hook then terminate with 0/1;
//! - [`supervisor`]: role dispatch and the master startup ordering;
//! - [`builder`]: constructs the wired `Arc<Supervisor>`.

mod boundary;
mod builder;
mod dispatcher;
mod registry;
mod shutdown;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use dispatcher::{Dispatcher, Lifecycle};
pub use registry::Registry;
pub use shutdown::{ExitCoordinator, Terminator};
pub use supervisor::Supervisor;
