// Storage facility trait for the dashboard's persisted records

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage facility is unavailable")]
    Unavailable,
    #[error("storage quota exceeded while writing {key} ({needed} of {quota} bytes)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A synchronous string key-value facility, in the spirit of browser local storage.
///
/// Any call may fail; callers go through the storage gateway, which turns
/// failures into defaults.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, `None` when absent
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}
