//! Application root instances.
//!
//! A root owns at most one dynamic modals container. The facade reaches the
//! container through the root captured at install time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::ui::container::DynamicContainer;

static ROOT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(u64);

pub struct AppRoot {
    id: RootId,
    container: Mutex<Option<DynamicContainer>>,
}

impl AppRoot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: RootId(ROOT_ID_COUNTER.fetch_add(1, Ordering::Relaxed)),
            container: Mutex::new(None),
        })
    }

    pub fn id(&self) -> RootId {
        self.id
    }

    /// The mounted container, if any.
    pub fn container(&self) -> Option<DynamicContainer> {
        self.container.lock().clone()
    }

    /// Return the root's container, creating it on first use.
    pub(crate) fn ensure_container(&self) -> DynamicContainer {
        self.container
            .lock()
            .get_or_insert_with(DynamicContainer::new)
            .clone()
    }

    /// Unmount the container. Open dynamic modals go with it.
    pub fn unmount_container(&self) -> Option<DynamicContainer> {
        self.container.lock().take()
    }
}

impl std::fmt::Debug for AppRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRoot")
            .field("id", &self.id)
            .field("has_container", &self.container.lock().is_some())
            .finish()
    }
}
