//! # Worker handle registry.
//!
//! Ordered collection of live [`WorkerHandle`]s. Populated synchronously
//! during the initial pool spawn and by any runtime `create_worker` call;
//! entries are removed only by the exit handler, matching by identifier,
//! never by position.
//!
//! ## Rules
//! - A handle appears at most once (duplicate ids are rejected).
//! - Removal preserves the relative order of the remaining handles.
//! - Pool exhaustion is detected by counting remaining entries after a
//!   removal, never by a separate counter, so extensions that manipulate the
//!   registry directly (auto-respawn) stay consistent with the check.
//!
//! The registry is shared as `Arc<Registry>` and guarded by an async RwLock.
//! All standard mutations happen on the master's single supervision loop;
//! an extension that removes-then-re-adds outside the exit path can still
//! race the exhaustion check between its two awaits. That ordering hazard is
//! inherited from the design and intentionally not papered over here.

use tokio::sync::RwLock;

use crate::process::{WorkerHandle, WorkerId};

/// Ordered live set of worker handles.
pub struct Registry {
    workers: RwLock<Vec<WorkerHandle>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            workers: RwLock::new(Vec::new()),
        }
    }

    /// Appends a handle; rejects a duplicate identifier.
    ///
    /// Returns `true` if the handle was added.
    pub async fn add(&self, handle: WorkerHandle) -> bool {
        let mut workers = self.workers.write().await;
        if workers.iter().any(|w| w.id() == handle.id()) {
            return false;
        }
        workers.push(handle);
        true
    }

    /// Removes exactly the handle with the given identifier.
    pub async fn remove(&self, id: WorkerId) -> Option<WorkerHandle> {
        let mut workers = self.workers.write().await;
        let pos = workers.iter().position(|w| w.id() == id)?;
        Some(workers.remove(pos))
    }

    /// Looks up a live handle by identifier.
    pub async fn get(&self, id: WorkerId) -> Option<WorkerHandle> {
        self.workers.read().await.iter().find(|w| w.id() == id).cloned()
    }

    /// Number of live handles.
    pub async fn len(&self) -> usize {
        self.workers.read().await.len()
    }

    /// True when no handles remain.
    pub async fn is_empty(&self) -> bool {
        self.workers.read().await.is_empty()
    }

    /// Identifiers of the live handles, in registry order.
    pub async fn ids(&self) -> Vec<WorkerId> {
        self.workers.read().await.iter().map(WorkerHandle::id).collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::process::WorkerProcess;

    struct Inert;

    impl WorkerProcess for Inert {
        fn kill(&self, _code: i32) {}
    }

    fn handle(id: WorkerId) -> WorkerHandle {
        WorkerHandle::new(id, Arc::new(Inert))
    }

    #[tokio::test]
    async fn removal_preserves_relative_order() {
        let reg = Registry::new();
        for id in [1, 2, 3] {
            assert!(reg.add(handle(id)).await);
        }

        assert_eq!(reg.remove(2).await.map(|h| h.id()), Some(2));
        assert_eq!(reg.ids().await, vec![1, 3]);
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() {
        let reg = Registry::new();
        assert!(reg.add(handle(7)).await);
        assert!(!reg.add(handle(7)).await);
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn remove_matches_by_identifier_not_position() {
        let reg = Registry::new();
        reg.add(handle(10)).await;
        reg.add(handle(20)).await;

        assert!(reg.remove(99).await.is_none());
        assert_eq!(reg.len().await, 2);

        assert_eq!(reg.remove(10).await.map(|h| h.id()), Some(10));
        assert!(reg.remove(10).await.is_none());
        assert_eq!(reg.ids().await, vec![20]);
        assert!(!reg.is_empty().await);
    }
}
