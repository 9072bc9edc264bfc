//! Atomic replacement of the published model set
//!
//! Readers clone the current `Arc<ModelSet>` and forecast against it with no
//! lock held. A reload builds a complete new `ModelSet` off to the side and
//! swaps the pointer; a published set is never modified.

use crate::models::ModelSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Shared handle to the current model set
#[derive(Debug)]
pub struct SnapshotCell {
    current: RwLock<Arc<ModelSet>>,
}

impl SnapshotCell {
    pub fn new(models: ModelSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(models)),
        }
    }

    /// The model set published at the time of the call
    pub fn current(&self) -> Arc<ModelSet> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish `models`, returning the set it replaces
    pub fn replace(&self, models: ModelSet) -> Arc<ModelSet> {
        let next = Arc::new(models);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        info!(models = next.len(), "published new model set");
        std::mem::replace(&mut *guard, next)
    }
}
