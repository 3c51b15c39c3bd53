//! # Core subscriber trait.
//!
//! `Subscribe` is the extension point for plugging custom event observers
//! into the runtime — the documented home for things like external metrics
//! counters incremented on worker create/exit.
//!
//! ## Contract
//! - `on_event` runs on the supervision loop: keep it prompt, prefer async
//!   I/O, and offload heavy work to your own tasks.
//! - Panics are caught by the [`SubscriberSet`](crate::SubscriberSet) and do
//!   not reach the master.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
