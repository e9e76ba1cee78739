// News article domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub image_url: String,
}

/// Canonical article fields produced by the format adapters and sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticleDraft {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub image_url: String,
}

impl NewsArticle {
    pub fn from_draft(draft: NewsArticleDraft, id: String) -> Self {
        Self {
            id,
            title: draft.title,
            summary: draft.summary,
            source: draft.source,
            url: draft.url,
            published_at: draft.published_at,
            image_url: draft.image_url,
        }
    }
}
