// Dashboard service - Single-writer handle shared by the HTTP layer
use crate::application::dashboard_store::{DashboardStore, Hydration};
use crate::application::error::DashboardError;
use crate::domain::application::Application;
use crate::domain::dashboard::DashboardState;
use crate::infrastructure::news_parser::NewsFormat;
use crate::infrastructure::storage_gateway::{FailureObserver, StorageFailure, StorageGateway};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub available: bool,
    pub failures: u64,
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<Mutex<DashboardStore>>,
    storage_failures: Arc<AtomicU64>,
    default_news_source: String,
}

impl DashboardService {
    /// Build a hydrated service. Storage failures reported by `storage` are counted.
    pub fn new(storage: StorageGateway, default_news_source: String) -> Self {
        let storage_failures = Arc::new(AtomicU64::new(0));
        let counter = storage_failures.clone();
        let observer: FailureObserver = Arc::new(move |_failure: &StorageFailure<'_>| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let store = DashboardStore::with_system_sources(storage.with_observer(observer));
        Self::from_store(store, storage_failures, default_news_source)
    }

    pub fn from_store(
        mut store: DashboardStore,
        storage_failures: Arc<AtomicU64>,
        default_news_source: String,
    ) -> Self {
        let Hydration {
            applications,
            news_articles,
            last_news_update,
        } = store.hydrate();
        tracing::info!(
            applications,
            news_articles,
            last_news_update = ?last_news_update,
            "dashboard ready"
        );

        Self {
            store: Arc::new(Mutex::new(store)),
            storage_failures,
            default_news_source,
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.store.lock().await.state().clone()
    }

    pub async fn list_applications(&self) -> Vec<Application> {
        self.store.lock().await.state().applications.clone()
    }

    /// Run `job` against the store on the blocking pool; storage facilities do synchronous i/o.
    async fn run_blocking<R, F>(&self, job: F) -> Result<R, DashboardError>
    where
        F: FnOnce(&mut DashboardStore) -> R + Send + 'static,
        R: Send + 'static,
    {
        let mut store = self.store.clone().lock_owned().await;
        Ok(tokio::task::spawn_blocking(move || job(&mut store)).await?)
    }

    pub async fn add_application(&self, candidate: &Value) -> Result<Application, DashboardError> {
        let candidate = candidate.clone();
        self.run_blocking(move |store| store.add_application(&candidate))
            .await?
    }

    pub async fn update_application(
        &self,
        id: &str,
        changes: &Value,
    ) -> Result<Application, DashboardError> {
        let id = id.to_string();
        let changes = changes.clone();
        self.run_blocking(move |store| store.update_application(&id, &changes))
            .await?
    }

    pub async fn delete_application(&self, id: &str) -> Result<(), DashboardError> {
        let owned_id = id.to_string();
        if self
            .run_blocking(move |store| store.delete_application(&owned_id))
            .await?
        {
            Ok(())
        } else {
            Err(DashboardError::ApplicationNotFound(id.to_string()))
        }
    }

    pub async fn set_news_loading(&self, loading: bool) -> Result<(), DashboardError> {
        self.run_blocking(move |store| store.set_news_loading(loading))
            .await
    }

    pub async fn set_news_error(&self, error: Option<String>) -> Result<(), DashboardError> {
        self.run_blocking(move |store| store.set_news_error(error))
            .await
    }

    /// Parse and install a batch of feed items, returning the resulting state.
    pub async fn ingest_news(
        &self,
        items: &Value,
        format: Option<&str>,
        source: Option<&str>,
    ) -> Result<(usize, DashboardState), DashboardError> {
        let format = format.map(NewsFormat::from_tag).unwrap_or(NewsFormat::Generic);
        let source = source
            .unwrap_or(self.default_news_source.as_str())
            .to_string();
        let items = items.clone();

        self.run_blocking(move |store| {
            let kept = store.ingest_news(&items, format, &source);
            (kept, store.state().clone())
        })
        .await
    }

    pub async fn storage_status(&self) -> Result<StorageStatus, DashboardError> {
        let available = self
            .run_blocking(|store| store.storage().is_available())
            .await?;
        Ok(StorageStatus {
            available,
            failures: self.storage_failures.load(Ordering::Relaxed),
        })
    }

    pub async fn clear_storage(&self) -> Result<bool, DashboardError> {
        self.run_blocking(|store| store.clear_persisted()).await
    }
}
