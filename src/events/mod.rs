//! Runtime events: types, broadcast bus, and canonical log rendering.
//!
//! This module groups the event **data model**, the **bus** used to
//! publish/subscribe to lifecycle signals and supervision decisions, and the
//! **render** helpers producing the canonical human-readable log lines.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] — event classification and payload metadata
//! - [`Bus`] — thin wrapper over `tokio::sync::broadcast`
//! - `render` — one pure formatting function per logged lifecycle moment
//!
//! ## Quick reference
//! - **Publishers**: the process host (the five lifecycle signals), the
//!   dispatcher (`WorkerCreated`, `PoolExhausted`), the fault boundaries
//!   (`WorkerFaulted`), and the supervisor (`MasterFaulted`).
//! - **Consumers**: the supervisor's lifecycle listener, which fans events out
//!   to subscribers and routes the five signal classes to the [`Lifecycle`]
//!   handlers.
//!
//! [`Lifecycle`]: crate::Lifecycle

mod bus;
mod event;
pub(crate) mod render;

pub use bus::Bus;
pub use event::{Event, EventKind};
