use std::sync::Arc;

use crate::error::SyncFault;

use super::Entity;

/// Consumer-visible state of one live collection.
///
/// `rows` is the last committed snapshot, replaced wholesale and never
/// patched in place.  Equality compares the snapshot by `Arc` pointer
/// identity: the orchestrator only allocates a new `Arc` after the deep
/// equality check decided the data actually changed, so an unchanged
/// pointer means consumers were not notified.
#[derive(Debug, Clone)]
pub struct CollectionState {
    /// Last committed snapshot.
    pub rows: Arc<Vec<Entity>>,
    /// True while a fetch is in flight for the active scope.
    pub loading: bool,
    /// Last fetch-path fault, cleared on the next successful load.
    pub error: Option<SyncFault>,
}

impl CollectionState {
    /// Initial state: empty rows, loading.
    pub fn initial() -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            loading: true,
            error: None,
        }
    }

    /// True when the last fetch failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl PartialEq for CollectionState {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
            && self.loading == other.loading
            && self.error == other.error
    }
}
