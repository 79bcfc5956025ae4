//! Shared, atomically replaceable store snapshots
//!
//! Readers take an `Arc<ContentStore>` and query it without holding any lock.
//! A reload builds a complete new store and swaps the pointer, so readers see
//! either the old store or the new one, never a mix.

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::config::ValidationConfig;
use crate::error::LoadError;
use crate::loader::ContentLoader;
use crate::store::ContentStore;

/// The currently published content store
#[derive(Debug, Default)]
pub struct SharedStore {
    current: RwLock<Arc<ContentStore>>,
}

impl SharedStore {
    pub fn new(store: ContentStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    /// The store as of now; later publishes do not affect it
    pub fn snapshot(&self) -> Arc<ContentStore> {
        // The guarded value is a plain Arc, so a poisoned lock is still consistent
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the published store, returning the previous one
    pub fn publish(&self, store: ContentStore) -> Arc<ContentStore> {
        debug!(count = store.len(), "publish: called");
        let next = Arc::new(store);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, next)
    }

    /// Rebuild from the loader if its sources changed, then publish
    ///
    /// Returns `Ok(false)` when nothing changed. On any load or validation
    /// failure the previous store stays published and the loader keeps the
    /// state it was built from, so the next call reports the failure again.
    pub fn reload(&self, loader: &mut ContentLoader, config: &ValidationConfig) -> Result<bool, LoadError> {
        debug!("SharedStore::reload: called");
        let loaded = loader.reload(config).inspect_err(|e| {
            warn!(error = %e, "Content reload failed, keeping current store");
        })?;
        let Some(loaded) = loaded else {
            debug!("SharedStore::reload: no changes");
            return Ok(false);
        };

        let count = loaded.store.len();
        self.publish(loaded.store);
        info!(count, "Published reloaded content");
        Ok(true)
    }
}
