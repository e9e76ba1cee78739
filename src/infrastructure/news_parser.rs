// Mappers from external news-item shapes to the canonical article draft
use crate::domain::news::NewsArticleDraft;
use crate::domain::timestamp::parse_timestamp;
use chrono::{DateTime, Utc};
use serde_json::Value;

const RSS_SOURCE: &str = "RSS Feed";
const NEWS_API_SOURCE: &str = "News API";
pub const DEFAULT_SOURCE: &str = "News";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsFormat {
    Rss,
    NewsApi,
    Generic,
}

impl NewsFormat {
    /// Unrecognised tags fall back to generic parsing.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "rss" => NewsFormat::Rss,
            "newsapi" => NewsFormat::NewsApi,
            _ => NewsFormat::Generic,
        }
    }
}

/// A non-empty string field; empty strings and other JSON types count as absent
fn text(item: &Value, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_text(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(item, key))
}

/// Truthy in the feed's own terms: non-empty strings, non-zero numbers, objects, arrays, `true`
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `source.name` when source is an object, else `source` when it is a string
fn source_name(item: &Value) -> Option<String> {
    item.get("source")
        .and_then(|source| text(source, "name"))
        .or_else(|| text(item, "source"))
}

pub fn parse_rss_item(item: &Value, now: DateTime<Utc>) -> NewsArticleDraft {
    NewsArticleDraft {
        title: text(item, "title").unwrap_or_default(),
        summary: first_text(item, &["description", "summary"]).unwrap_or_default(),
        source: text(item, "source").unwrap_or_else(|| RSS_SOURCE.to_string()),
        url: first_text(item, &["link", "url"]).unwrap_or_default(),
        published_at: item.get("pubDate").and_then(parse_timestamp).unwrap_or(now),
        image_url: item
            .get("enclosure")
            .and_then(|enclosure| text(enclosure, "url"))
            .or_else(|| text(item, "image"))
            .unwrap_or_default(),
    }
}

pub fn parse_news_api_item(item: &Value, now: DateTime<Utc>) -> NewsArticleDraft {
    NewsArticleDraft {
        title: text(item, "title").unwrap_or_default(),
        summary: first_text(item, &["description", "content"]).unwrap_or_default(),
        source: source_name(item).unwrap_or_else(|| NEWS_API_SOURCE.to_string()),
        url: first_text(item, &["url", "link"]).unwrap_or_default(),
        published_at: item.get("publishedAt").and_then(parse_timestamp).unwrap_or(now),
        image_url: first_text(item, &["urlToImage", "image"]).unwrap_or_default(),
    }
}

pub fn parse_generic_item(item: &Value, default_source: &str, now: DateTime<Utc>) -> NewsArticleDraft {
    // Only the first present date field is considered; if it does not parse, `now` wins
    let published_at = ["publishedAt", "pubDate", "date", "published"]
        .iter()
        .filter_map(|key| item.get(*key))
        .find(|value| is_present(value))
        .and_then(parse_timestamp)
        .unwrap_or(now);

    NewsArticleDraft {
        title: first_text(item, &["title", "headline"]).unwrap_or_default(),
        summary: first_text(item, &["summary", "description", "excerpt", "content"])
            .unwrap_or_default(),
        source: source_name(item)
            .or_else(|| text(item, "publisher"))
            .unwrap_or_else(|| default_source.to_string()),
        url: first_text(item, &["url", "link", "href"]).unwrap_or_default(),
        published_at,
        image_url: first_text(item, &["imageUrl", "urlToImage", "image", "thumbnail"])
            .unwrap_or_default(),
    }
}

/// Map a batch of raw items and keep only those with both a title and a url.
pub fn parse_news_items(
    items: &Value,
    format: NewsFormat,
    default_source: &str,
    now: DateTime<Utc>,
) -> Vec<NewsArticleDraft> {
    let Some(items) = items.as_array() else {
        return Vec::new();
    };

    let parsed: Vec<NewsArticleDraft> = items
        .iter()
        .map(|item| match format {
            NewsFormat::Rss => parse_rss_item(item, now),
            NewsFormat::NewsApi => parse_news_api_item(item, now),
            NewsFormat::Generic => parse_generic_item(item, default_source, now),
        })
        .filter(|draft| !draft.title.is_empty() && !draft.url.is_empty())
        .collect();

    tracing::debug!(
        ?format,
        received = items.len(),
        kept = parsed.len(),
        "parsed news items"
    );

    parsed
}
