//! Per-key async locks
//!
//! Serializes read-modify-write cycles on one session (or one owner) while
//! leaving unrelated keys free to proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held for the duration of a locked operation
pub type KeyGuard = OwnedMutexGuard<()>;

/// Registry of one async mutex per key
///
/// Entries hold weak references; once no guard or waiter keeps a key's
/// mutex alive it is pruned on the next acquisition.
#[derive(Default)]
pub struct SessionLocks {
    entries: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let mutex = self.mutex_for(key);
        mutex.lock_owned().await
    }

    /// Lock keyed by session id
    pub async fn session(&self, session_id: &str) -> KeyGuard {
        self.acquire(&format!("session:{session_id}")).await
    }

    /// Lock keyed by owner uid
    pub async fn owner(&self, uid: &str) -> KeyGuard {
        self.acquire(&format!("owner:{uid}")).await
    }

    /// Number of keys currently tracked
    pub fn tracked(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.values().filter(|w| w.strong_count() > 0).count()
    }

    fn mutex_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.retain(|_, weak| weak.strong_count() > 0);

        if let Some(existing) = entries.get(key).and_then(Weak::upgrade) {
            return existing;
        }
        let mutex = Arc::new(AsyncMutex::new(()));
        entries.insert(key.to_string(), Arc::downgrade(&mutex));
        mutex
    }
}
