// Dashboard state container - Owns the state, mints entities, runs storage effects
use crate::application::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::application::error::DashboardError;
use crate::domain::application::Application;
use crate::domain::dashboard::{reduce, DashboardAction, DashboardState};
use crate::domain::news::NewsArticle;
use crate::domain::validation::{sanitize_application, validate_application};
use crate::infrastructure::news_parser::{parse_news_items, NewsFormat};
use crate::infrastructure::storage_gateway::StorageGateway;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;

const EDITABLE_FIELDS: [&str; 4] = ["name", "url", "icon", "description"];

/// What `hydrate` found in storage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydration {
    pub applications: usize,
    pub news_articles: usize,
    pub last_news_update: Option<DateTime<Utc>>,
}

pub struct DashboardStore {
    state: DashboardState,
    storage: StorageGateway,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    hydrated: bool,
}

impl DashboardStore {
    pub fn new(storage: StorageGateway, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: DashboardState::default(),
            storage,
            clock,
            ids,
            hydrated: false,
        }
    }

    pub fn with_system_sources(storage: StorageGateway) -> Self {
        Self::new(storage, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn storage(&self) -> &StorageGateway {
        &self.storage
    }

    /// Seed state from storage. Runs at most once; each record is loaded independently.
    pub fn hydrate(&mut self) -> Hydration {
        if self.hydrated {
            return Hydration::default();
        }
        self.hydrated = true;

        if !self.storage.is_available() {
            tracing::info!("storage unavailable, dashboard runs in memory only");
            return Hydration::default();
        }

        let mut hydration = Hydration::default();

        let applications = self.storage.get_applications();
        if !applications.is_empty() {
            hydration.applications = applications.len();
            self.dispatch(DashboardAction::SetApplications(applications));
        }

        let cached_news = self.storage.get_cached_news();
        if !cached_news.is_empty() {
            hydration.news_articles = cached_news.len();
            self.dispatch(DashboardAction::SetNewsData(cached_news));
        }

        if let Some(last_update) = self.storage.get_last_news_update() {
            hydration.last_news_update = Some(last_update);
            self.dispatch(DashboardAction::UpdateNewsTimestamp(last_update));
        }

        tracing::debug!(?hydration, "hydrated dashboard");
        hydration
    }

    /// Reduce `action` into the state, then persist applications if they changed.
    pub fn dispatch(&mut self, action: DashboardAction) {
        let kind = action.kind();
        let next = reduce(&self.state, action);
        let applications_changed = next.applications != self.state.applications;
        self.state = next;

        tracing::trace!(kind, applications_changed, "dispatched action");

        if applications_changed {
            self.persist_applications();
        }
    }

    /// Dispatch an untyped `{type, payload}` action. Unknown kinds change nothing.
    pub fn dispatch_tagged(&mut self, raw: &Value) -> bool {
        match DashboardAction::decode(raw) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => {
                tracing::debug!(action = %raw, "ignoring unknown action");
                false
            }
        }
    }

    fn persist_applications(&self) {
        if self.storage.is_available() {
            self.storage.save_applications(&self.state.applications);
        }
    }

    pub fn add_application(&mut self, candidate: &Value) -> Result<Application, DashboardError> {
        let report = validate_application(candidate);
        if !report.is_valid {
            return Err(DashboardError::InvalidApplication {
                errors: report.errors,
            });
        }

        let application = Application::create(
            sanitize_application(candidate),
            self.ids.next_id(),
            self.clock.now(),
        );
        tracing::info!(id = %application.id, name = %application.name, "adding application");

        self.dispatch(DashboardAction::AddApplication(application.clone()));
        Ok(application)
    }

    /// Overlay `changes` on the stored application and validate the result before replacing it.
    pub fn update_application(
        &mut self,
        id: &str,
        changes: &Value,
    ) -> Result<Application, DashboardError> {
        let existing = self
            .state
            .applications
            .iter()
            .find(|app| app.id == id)
            .ok_or_else(|| DashboardError::ApplicationNotFound(id.to_string()))?;

        let Some(changes) = changes.as_object() else {
            return Err(DashboardError::InvalidApplication {
                errors: vec!["Application must be an object".to_string()],
            });
        };

        let current = existing.draft();
        let mut merged = Map::new();
        merged.insert("name".to_string(), Value::String(current.name));
        merged.insert("url".to_string(), Value::String(current.url));
        merged.insert("icon".to_string(), Value::String(current.icon));
        merged.insert("description".to_string(), Value::String(current.description));
        for field in EDITABLE_FIELDS {
            if let Some(value) = changes.get(field) {
                merged.insert(field.to_string(), value.clone());
            }
        }
        let merged = Value::Object(merged);

        let report = validate_application(&merged);
        if !report.is_valid {
            return Err(DashboardError::InvalidApplication {
                errors: report.errors,
            });
        }

        let updated = existing.revise(sanitize_application(&merged), self.clock.now());
        tracing::info!(id = %updated.id, "updating application");

        self.dispatch(DashboardAction::UpdateApplication(updated.clone()));
        Ok(updated)
    }

    /// Remove the application with `id`; returns whether one was there.
    pub fn delete_application(&mut self, id: &str) -> bool {
        let existed = self.state.applications.iter().any(|app| app.id == id);
        self.dispatch(DashboardAction::DeleteApplication(id.to_string()));
        if existed {
            tracing::info!(id, "deleted application");
        }
        existed
    }

    pub fn set_news_loading(&mut self, loading: bool) {
        self.dispatch(DashboardAction::SetNewsLoading(loading));
    }

    pub fn set_news_error(&mut self, error: Option<String>) {
        if let Some(message) = &error {
            tracing::warn!(%message, "news refresh failed");
        }
        self.dispatch(DashboardAction::SetNewsError(error));
    }

    /// Replace the news list, stamp the refresh time and cache both in storage.
    pub fn set_news_data(&mut self, articles: Vec<NewsArticle>) -> DateTime<Utc> {
        let now = self.clock.now();

        self.dispatch(DashboardAction::SetNewsData(articles));
        self.dispatch(DashboardAction::UpdateNewsTimestamp(now));

        if self.storage.is_available() {
            self.storage.save_last_news_update(now);
            self.storage.save_news_cache(&self.state.news_data);
        }

        now
    }

    /// Normalize raw feed items and install them as the current news. Returns how many were kept.
    pub fn ingest_news(&mut self, items: &Value, format: NewsFormat, default_source: &str) -> usize {
        let drafts = parse_news_items(items, format, default_source, self.clock.now());
        let articles: Vec<NewsArticle> = drafts
            .into_iter()
            .map(|draft| NewsArticle::from_draft(draft, self.ids.next_id()))
            .collect();
        let count = articles.len();

        self.set_news_data(articles);
        count
    }

    /// Drop every persisted record; in-memory state is left alone.
    pub fn clear_persisted(&self) -> bool {
        self.storage.clear_dashboard()
    }
}
