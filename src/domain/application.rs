// Application shortcut domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitized application fields, before an id and timestamps are assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub description: String,
}

impl Application {
    pub fn create(draft: ApplicationDraft, id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            url: draft.url,
            icon: draft.icon,
            description: draft.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply new field values, keeping `id` and `created_at`.
    pub fn revise(&self, draft: ApplicationDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            name: draft.name,
            url: draft.url,
            icon: draft.icon,
            description: draft.description,
            created_at: self.created_at,
            updated_at: now.max(self.created_at),
        }
    }

    pub fn draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            name: self.name.clone(),
            url: self.url.clone(),
            icon: self.icon.clone(),
            description: self.description.clone(),
        }
    }
}
