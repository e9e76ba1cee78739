// In-memory key-value store with an optional quota and a kill switch
use crate::application::key_value_store::{KeyValueStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    disabled: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes once keys plus values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// While disabled every operation fails, like storage in a locked-down browser.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StoreError> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        self.entries.lock().map_err(|_| StoreError::Unavailable)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries()?;

        if let Some(quota) = self.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    quota,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
