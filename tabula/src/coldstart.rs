//! Per-process cold-start memoization.
//!
//! Bootstrap and migration work must happen at most once per
//! (deployment, table) pair during a process's lifetime. The cache is
//! an explicit object owned by its manager, not process-global state;
//! its lifetime is the manager's. Each key owns a single-flight lock,
//! so concurrent connect attempts for one key serialize their
//! check-and-mark instead of racing into duplicate bootstraps.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Memo of which (deployment, table) keys have been initialized.
///
/// # Examples
///
/// ```
/// use tabula::ColdStartCache;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let cache = ColdStartCache::new();
/// assert!(!cache.has_initialized("local-orders").await);
/// cache.mark_initialized("local-orders").await;
/// assert!(cache.has_initialized("local-orders").await);
/// cache.clear("local-orders").await;
/// assert!(!cache.has_initialized("local-orders").await);
/// # });
/// ```
#[derive(Default)]
pub struct ColdStartCache {
    entries: Mutex<HashMap<String, Arc<Mutex<bool>>>>,
}

impl ColdStartCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the single-flight slot for a key, creating it unset.
    ///
    /// Callers hold the slot's lock across their check, initialization
    /// work, and mark.
    pub(crate) async fn slot(&self, key: &str) -> Arc<Mutex<bool>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(entries.entry(key.to_string()).or_default())
    }

    /// Whether a key has completed initialization.
    ///
    /// Waits for an in-flight initialization of the same key to settle
    /// before answering.
    pub async fn has_initialized(&self, key: &str) -> bool {
        let slot = {
            let entries = self.entries.lock().await;
            entries.get(key).map(Arc::clone)
        };
        match slot {
            Some(slot) => *slot.lock().await,
            None => false,
        }
    }

    /// Marks a key as initialized.
    pub async fn mark_initialized(&self, key: &str) {
        let slot = self.slot(key).await;
        *slot.lock().await = true;
    }

    /// Forgets a key, so the next connect re-runs initialization.
    pub async fn clear(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}
