use super::Dataset;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared access to the current dataset.
///
/// Readers take an `Arc` snapshot and query it without holding any lock;
/// `replace` swaps in a fully built dataset with one pointer assignment, so
/// a reader sees either the old table or the new one, never a mix.
#[derive(Debug)]
pub struct DatasetHandle {
    current: RwLock<Arc<Dataset>>,
}

impl DatasetHandle {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    pub fn snapshot(&self) -> Arc<Dataset> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Publish a new dataset; returns the one it replaced.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = std::mem::replace(&mut *guard, next);
        info!("Dataset replaced");
        previous
    }
}
