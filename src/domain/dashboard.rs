// Dashboard aggregate and its reducer
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::application::Application;
use super::news::NewsArticle;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub applications: Vec<Application>,
    pub news_data: Vec<NewsArticle>,
    pub news_loading: bool,
    pub news_error: Option<String>,
    pub last_news_update: Option<DateTime<Utc>>,
}

/// Every state transition the dashboard understands.
///
/// Externally tagged as `{"type": "ADD_APPLICATION", "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardAction {
    SetApplications(Vec<Application>),
    AddApplication(Application),
    UpdateApplication(Application),
    DeleteApplication(String),
    SetNewsLoading(bool),
    SetNewsData(Vec<NewsArticle>),
    SetNewsError(Option<String>),
    UpdateNewsTimestamp(DateTime<Utc>),
}

impl DashboardAction {
    /// Decode an externally produced action; unknown kinds yield `None`.
    pub fn decode(raw: &Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DashboardAction::SetApplications(_) => "SET_APPLICATIONS",
            DashboardAction::AddApplication(_) => "ADD_APPLICATION",
            DashboardAction::UpdateApplication(_) => "UPDATE_APPLICATION",
            DashboardAction::DeleteApplication(_) => "DELETE_APPLICATION",
            DashboardAction::SetNewsLoading(_) => "SET_NEWS_LOADING",
            DashboardAction::SetNewsData(_) => "SET_NEWS_DATA",
            DashboardAction::SetNewsError(_) => "SET_NEWS_ERROR",
            DashboardAction::UpdateNewsTimestamp(_) => "UPDATE_NEWS_TIMESTAMP",
        }
    }
}

pub fn reduce(state: &DashboardState, action: DashboardAction) -> DashboardState {
    match action {
        DashboardAction::SetApplications(applications) => DashboardState {
            applications,
            ..state.clone()
        },
        DashboardAction::AddApplication(application) => {
            let mut next = state.clone();
            next.applications.push(application);
            next
        }
        DashboardAction::UpdateApplication(updated) => DashboardState {
            applications: state
                .applications
                .iter()
                .map(|app| if app.id == updated.id { updated.clone() } else { app.clone() })
                .collect(),
            ..state.clone()
        },
        DashboardAction::DeleteApplication(id) => DashboardState {
            applications: state
                .applications
                .iter()
                .filter(|app| app.id != id)
                .cloned()
                .collect(),
            ..state.clone()
        },
        DashboardAction::SetNewsLoading(news_loading) => DashboardState {
            news_loading,
            ..state.clone()
        },
        DashboardAction::SetNewsData(news_data) => DashboardState {
            news_data,
            news_loading: false,
            news_error: None,
            ..state.clone()
        },
        DashboardAction::SetNewsError(news_error) => DashboardState {
            news_error,
            news_loading: false,
            ..state.clone()
        },
        DashboardAction::UpdateNewsTimestamp(timestamp) => DashboardState {
            last_news_update: Some(timestamp),
            ..state.clone()
        },
    }
}

/// Reduce an untyped action; kinds the dashboard does not know leave the state as it was.
pub fn reduce_tagged(state: &DashboardState, raw: &Value) -> DashboardState {
    match DashboardAction::decode(raw) {
        Some(action) => reduce(state, action),
        None => state.clone(),
    }
}
