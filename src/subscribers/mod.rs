//! # Event subscribers.
//!
//! Subscribers are the passive observation surface of the runtime: metrics
//! counters, audit trails, external dashboards. They receive every [`Event`]
//! the supervision loop processes, including the supervision decisions
//! (`WorkerCreated`, `WorkerFaulted`, `PoolExhausted`) that the `Lifecycle`
//! handlers themselves produce.
//!
//! ## Architecture
//! ```text
//! host / dispatcher / boundaries ── publish(Event) ──► Bus
//!                                                       │
//!                                       supervisor lifecycle listener
//!                                                       │
//!                                            SubscriberSet::emit(&Event)
//!                                             ├──► metrics.on_event()
//!                                             ├──► audit.on_event()
//!                                             └──► ...
//! ```
//!
//! Dispatch is sequential on the supervision loop; a panicking subscriber is
//! isolated and logged, never crashing the master.
//!
//! [`Event`]: crate::events::Event

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
