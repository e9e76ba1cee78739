// Persistence adapter - Best-effort JSON records over a key-value store
use crate::application::key_value_store::{KeyValueStore, StoreError};
use crate::domain::application::Application;
use crate::domain::news::NewsArticle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

pub const APPLICATIONS_KEY: &str = "dashboard_applications";
pub const NEWS_CACHE_KEY: &str = "dashboard_news_cache";
pub const LAST_NEWS_UPDATE_KEY: &str = "dashboard_last_news_update";

const AVAILABILITY_KEY: &str = "__storage_test__";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no storage facility is attached")]
    Detached,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not decode {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not encode {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Read,
    Write,
    Remove,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StorageOperation::Read => "read",
            StorageOperation::Write => "write",
            StorageOperation::Remove => "remove",
        };
        f.write_str(label)
    }
}

/// A storage call that was swallowed and replaced by a fallback.
#[derive(Debug)]
pub struct StorageFailure<'a> {
    pub operation: StorageOperation,
    pub key: &'a str,
    pub error: &'a StorageError,
}

pub type FailureObserver = Arc<dyn Fn(&StorageFailure<'_>) + Send + Sync>;

#[derive(Clone, Default)]
pub struct StorageGateway {
    store: Option<Arc<dyn KeyValueStore>>,
    observer: Option<FailureObserver>,
}

impl fmt::Debug for StorageGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageGateway")
            .field("attached", &self.store.is_some())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store: Some(store),
            observer: None,
        }
    }

    /// A gateway with no facility behind it; every read falls back and every write fails.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: FailureObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_available(&self) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        match store
            .set_item(AVAILABILITY_KEY, AVAILABILITY_KEY)
            .and_then(|()| store.remove_item(AVAILABILITY_KEY))
        {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "storage availability check failed");
                false
            }
        }
    }

    fn store(&self) -> Result<&Arc<dyn KeyValueStore>, StorageError> {
        self.store.as_ref().ok_or(StorageError::Detached)
    }

    /// Read and decode `key`, `Ok(None)` when nothing is stored
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store()?.get_item(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let store = self.store()?;
        let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        store.set_item(key, &encoded)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store()?.remove_item(key)?;
        Ok(())
    }

    fn report(&self, operation: StorageOperation, key: &str, error: &StorageError) {
        tracing::warn!(%operation, key, error = %error, "storage operation failed");
        if let Some(observer) = &self.observer {
            observer(&StorageFailure {
                operation,
                key,
                error,
            });
        }
    }

    pub fn get_from_storage<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.read(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                self.report(StorageOperation::Read, key, &e);
                default
            }
        }
    }

    pub fn set_to_storage<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.write(key, value) {
            Ok(()) => true,
            Err(e) => {
                self.report(StorageOperation::Write, key, &e);
                false
            }
        }
    }

    pub fn remove_from_storage(&self, key: &str) -> bool {
        match self.remove(key) {
            Ok(()) => true,
            Err(e) => {
                self.report(StorageOperation::Remove, key, &e);
                false
            }
        }
    }

    /// Decode an array record entry by entry, skipping entries that no longer parse.
    fn get_records<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw: Vec<serde_json::Value> = self.get_from_storage(key, Vec::new());
        raw.into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(key, index, error = %e, "skipping unreadable stored record");
                    None
                }
            })
            .collect()
    }

    pub fn get_applications(&self) -> Vec<Application> {
        self.get_records(APPLICATIONS_KEY)
    }

    pub fn save_applications(&self, applications: &[Application]) -> bool {
        self.set_to_storage(APPLICATIONS_KEY, applications)
    }

    pub fn get_cached_news(&self) -> Vec<NewsArticle> {
        self.get_records(NEWS_CACHE_KEY)
    }

    pub fn save_news_cache(&self, articles: &[NewsArticle]) -> bool {
        self.set_to_storage(NEWS_CACHE_KEY, articles)
    }

    pub fn get_last_news_update(&self) -> Option<DateTime<Utc>> {
        self.get_from_storage(LAST_NEWS_UPDATE_KEY, None)
    }

    pub fn save_last_news_update(&self, timestamp: DateTime<Utc>) -> bool {
        self.set_to_storage(LAST_NEWS_UPDATE_KEY, &timestamp)
    }

    /// Remove all three dashboard records; every removal is attempted.
    pub fn clear_dashboard(&self) -> bool {
        [APPLICATIONS_KEY, NEWS_CACHE_KEY, LAST_NEWS_UPDATE_KEY]
            .into_iter()
            .map(|key| self.remove_from_storage(key))
            .fold(true, |all, removed| all && removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;
    use chrono::TimeZone;
    use std::sync::Mutex;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn app(id: &str) -> Application {
        Application {
            id: id.to_string(),
            name: format!("App {}", id),
            url: "https://example.com".to_string(),
            icon: String::new(),
            description: "desc".to_string(),
            created_at: at(1),
            updated_at: at(2),
        }
    }

    fn memory_gateway() -> (Arc<MemoryStore>, StorageGateway) {
        let store = Arc::new(MemoryStore::new());
        let gateway = StorageGateway::new(store.clone());
        (store, gateway)
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(APPLICATIONS_KEY, "dashboard_applications");
        assert_eq!(NEWS_CACHE_KEY, "dashboard_news_cache");
        assert_eq!(LAST_NEWS_UPDATE_KEY, "dashboard_last_news_update");
    }

    #[test]
    fn test_get_from_storage_defaults() {
        let (store, gateway) = memory_gateway();
        assert_eq!(gateway.get_from_storage("missing", 7), 7);
        assert_eq!(gateway.get_from_storage::<Option<String>>("missing", None), None);

        store.set_item("corrupt", "{not json").unwrap();
        assert_eq!(gateway.get_from_storage("corrupt", vec![1, 2]), vec![1, 2]);

        store.set_item("present", "{\"test\":\"data\"}").unwrap();
        let value: serde_json::Value = gateway.get_from_storage("present", serde_json::Value::Null);
        assert_eq!(value["test"], "data");
    }

    #[test]
    fn test_applications_round_trip() {
        let (store, gateway) = memory_gateway();
        let apps = vec![app("1"), app("2")];

        assert!(gateway.save_applications(&apps));
        let raw = store.get_item(APPLICATIONS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"createdAt\":\"2024-01-01T01:00:00Z\""));

        assert_eq!(gateway.get_applications(), apps);
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let (store, gateway) = memory_gateway();
        let good = serde_json::to_string(&app("1")).unwrap();
        store
            .set_item(
                APPLICATIONS_KEY,
                &format!("[{good}, {{\"id\":\"2\",\"createdAt\":\"yesterday\"}}]"),
            )
            .unwrap();

        assert_eq!(gateway.get_applications(), vec![app("1")]);
    }

    #[test]
    fn test_news_cache_and_timestamp() {
        let (_store, gateway) = memory_gateway();
        assert!(gateway.get_cached_news().is_empty());
        assert_eq!(gateway.get_last_news_update(), None);

        let article = NewsArticle {
            id: "n1".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            source: "Source".to_string(),
            url: "https://news.example.com".to_string(),
            published_at: at(5),
            image_url: String::new(),
        };
        assert!(gateway.save_news_cache(std::slice::from_ref(&article)));
        assert!(gateway.save_last_news_update(at(6)));

        assert_eq!(gateway.get_cached_news(), vec![article]);
        assert_eq!(gateway.get_last_news_update(), Some(at(6)));
    }

    #[test]
    fn test_availability_check() {
        let (store, gateway) = memory_gateway();
        assert!(gateway.is_available());
        assert!(store.is_empty());

        store.set_disabled(true);
        assert!(!gateway.is_available());
        assert!(!StorageGateway::detached().is_available());

        let full = StorageGateway::new(Arc::new(MemoryStore::with_quota(4)));
        assert!(!full.is_available());
    }

    #[test]
    fn test_failures_degrade_and_are_observed() {
        let seen: Arc<Mutex<Vec<(StorageOperation, String)>>> = Arc::default();
        let sink = seen.clone();
        let store = Arc::new(MemoryStore::new());
        let observer: FailureObserver = Arc::new(move |failure: &StorageFailure<'_>| {
            sink.lock()
                .unwrap()
                .push((failure.operation, failure.key.to_string()));
        });
        let gateway = StorageGateway::new(store.clone()).with_observer(observer);

        store.set_disabled(true);
        assert!(!gateway.save_applications(&[app("1")]));
        assert!(gateway.get_applications().is_empty());
        assert!(!gateway.remove_from_storage(NEWS_CACHE_KEY));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (StorageOperation::Write, APPLICATIONS_KEY.to_string()),
                (StorageOperation::Read, APPLICATIONS_KEY.to_string()),
                (StorageOperation::Remove, NEWS_CACHE_KEY.to_string()),
            ]
        );
    }

    #[test]
    fn test_structured_errors() {
        let detached = StorageGateway::detached();
        assert!(matches!(
            detached.read::<String>(APPLICATIONS_KEY),
            Err(StorageError::Detached)
        ));
        assert!(!detached.save_last_news_update(at(1)));

        let store = Arc::new(MemoryStore::with_quota(8));
        let gateway = StorageGateway::new(store);
        assert!(matches!(
            gateway.write("k", "a long value"),
            Err(StorageError::Store(StoreError::QuotaExceeded { .. }))
        ));
    }

    #[test]
    fn test_clear_dashboard() {
        let (store, gateway) = memory_gateway();
        gateway.save_applications(&[app("1")]);
        gateway.save_last_news_update(at(3));

        assert!(gateway.clear_dashboard());
        assert!(store.is_empty());
    }
}
