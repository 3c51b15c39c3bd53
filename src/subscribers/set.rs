//! # SubscriberSet: fan-out with panic isolation.
//!
//! Distributes each event to every subscriber, sequentially, on the caller's
//! task. A subscriber that panics is reported at warn severity and skipped
//! for that event; the remaining subscribers still run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use super::Subscribe;
use crate::events::Event;

/// Composite fan-out over the configured subscribers.
pub struct SubscriberSet {
    subs: Vec<Arc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a new set.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Delivers one event to every subscriber, isolating panics.
    pub async fn emit(&self, event: &Event) {
        for sub in &self.subs {
            let fut = sub.on_event(event);
            if AssertUnwindSafe(fut).catch_unwind().await.is_err() {
                tracing::warn!(subscriber = sub.name(), "subscriber panicked, event skipped");
            }
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.len()
    }
}
