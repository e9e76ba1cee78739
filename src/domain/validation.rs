// Validation and sanitization of untyped application / article candidates
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::application::ApplicationDraft;
use super::news::NewsArticleDraft;
use super::timestamp::parse_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    fn rejected(message: &str) -> Self {
        Self::from_errors(vec![message.to_string()])
    }
}

/// True only for absolute URLs with an `http` or `https` scheme.
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    match Url::parse(candidate) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

pub fn is_non_empty_string(value: &Value) -> bool {
    value.as_str().is_some_and(|text| !text.trim().is_empty())
}

fn field_is_non_empty(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).is_some_and(is_non_empty_string)
}

fn trimmed(fields: &Map<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

fn check_url(fields: &Map<String, Value>, key: &str, label: &str, errors: &mut Vec<String>) {
    if !field_is_non_empty(fields, key) {
        errors.push(format!("{label} URL is required"));
    } else if !is_valid_url(&trimmed(fields, key)) {
        errors.push(format!("{label} URL must be a valid HTTP or HTTPS URL"));
    }
}

pub fn validate_application(candidate: &Value) -> ValidationReport {
    let Some(fields) = candidate.as_object() else {
        return ValidationReport::rejected("Application must be an object");
    };

    let mut errors = Vec::new();

    if !field_is_non_empty(fields, "name") {
        errors.push("Application name is required".to_string());
    }

    check_url(fields, "url", "Application", &mut errors);

    if fields.get("description").is_some_and(|value| !value.is_string()) {
        errors.push("Application description must be a string".to_string());
    }

    if fields.get("icon").is_some_and(|value| !value.is_string()) {
        errors.push("Application icon must be a string".to_string());
    }

    ValidationReport::from_errors(errors)
}

/// Trim every field; anything missing or not a string becomes `""`.
pub fn sanitize_application(candidate: &Value) -> ApplicationDraft {
    let empty = Map::new();
    let fields = candidate.as_object().unwrap_or(&empty);

    ApplicationDraft {
        name: trimmed(fields, "name"),
        url: trimmed(fields, "url"),
        icon: trimmed(fields, "icon"),
        description: trimmed(fields, "description"),
    }
}

pub fn validate_news_article(candidate: &Value) -> ValidationReport {
    let Some(fields) = candidate.as_object() else {
        return ValidationReport::rejected("Article must be an object");
    };

    let mut errors = Vec::new();

    for key in ["title", "summary", "source"] {
        if !field_is_non_empty(fields, key) {
            errors.push(format!("Article {key} is required"));
        }
    }

    check_url(fields, "url", "Article", &mut errors);

    if fields.get("publishedAt").and_then(parse_timestamp).is_none() {
        errors.push("Article published date is required and must be a valid Date".to_string());
    }

    match fields.get("imageUrl") {
        Some(value) if !value.is_string() => {
            errors.push("Article image URL must be a string".to_string());
        }
        Some(_) => {
            let image_url = trimmed(fields, "imageUrl");
            if !image_url.is_empty() && !is_valid_url(&image_url) {
                errors.push("Article image URL must be a valid HTTP or HTTPS URL".to_string());
            }
        }
        None => {}
    }

    ValidationReport::from_errors(errors)
}

/// Trim string fields; a missing or unreadable `publishedAt` becomes `now`.
pub fn sanitize_news_article(candidate: &Value, now: DateTime<Utc>) -> NewsArticleDraft {
    let empty = Map::new();
    let fields = candidate.as_object().unwrap_or(&empty);

    NewsArticleDraft {
        title: trimmed(fields, "title"),
        summary: trimmed(fields, "summary"),
        source: trimmed(fields, "source"),
        url: trimmed(fields, "url"),
        published_at: fields.get("publishedAt").and_then(parse_timestamp).unwrap_or(now),
        image_url: trimmed(fields, "imageUrl"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("http://example.com", true)]
    #[case("https://example.com/path?q=1", true)]
    #[case("  https://example.com  ", true)]
    #[case("ftp://x", false)]
    #[case("javascript:alert(1)", false)]
    #[case("not-a-url", false)]
    #[case("/relative/path", false)]
    #[case("", false)]
    fn test_is_valid_url(#[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(is_valid_url(candidate), expected);
    }

    #[test]
    fn test_is_non_empty_string() {
        assert!(is_non_empty_string(&json!("hello")));
        assert!(!is_non_empty_string(&json!("   ")));
        assert!(!is_non_empty_string(&json!("")));
        assert!(!is_non_empty_string(&json!(42)));
        assert!(!is_non_empty_string(&json!(null)));
    }

    #[test]
    fn test_valid_application() {
        let report = validate_application(&json!({
            "name": "Test App",
            "url": "https://example.com",
            "description": "A test application",
            "icon": "https://example.com/icon.png",
        }));
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_application_errors_accumulate() {
        let report = validate_application(&json!({
            "name": "   ",
            "url": "invalid-url",
            "description": 123,
            "icon": false,
        }));
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Application name is required",
                "Application URL must be a valid HTTP or HTTPS URL",
                "Application description must be a string",
                "Application icon must be a string",
            ]
        );
    }

    #[test]
    fn test_blank_url_reports_only_required() {
        let report = validate_application(&json!({ "name": "App", "url": "  " }));
        assert_eq!(report.errors, vec!["Application URL is required"]);

        let report = validate_application(&json!({ "name": "App", "url": 42 }));
        assert_eq!(report.errors, vec!["Application URL is required"]);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("string"))]
    #[case(json!(7))]
    #[case(json!(["name", "url"]))]
    fn test_non_object_application(#[case] candidate: Value) {
        let report = validate_application(&candidate);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Application must be an object"]);
    }

    #[test]
    fn test_sanitize_application_trims_and_defaults() {
        let draft = sanitize_application(&json!({
            "name": "  Test App  ",
            "url": "  https://example.com  ",
            "description": "  A test application  ",
        }));
        assert_eq!(
            draft,
            ApplicationDraft {
                name: "Test App".to_string(),
                url: "https://example.com".to_string(),
                icon: String::new(),
                description: "A test application".to_string(),
            }
        );

        assert_eq!(sanitize_application(&json!({})), ApplicationDraft::default());
        assert_eq!(sanitize_application(&json!("nope")), ApplicationDraft::default());
    }

    fn article() -> Value {
        json!({
            "title": "Test Article",
            "summary": "This is a test article",
            "source": "Test Source",
            "url": "https://example.com/article",
            "publishedAt": "2023-01-01T12:00:00Z",
            "imageUrl": "https://example.com/image.jpg",
        })
    }

    #[test]
    fn test_valid_news_article() {
        assert!(validate_news_article(&article()).is_valid);

        let mut minimal = article();
        minimal.as_object_mut().unwrap().remove("imageUrl");
        assert!(validate_news_article(&minimal).is_valid);

        let mut blank_image = article();
        blank_image["imageUrl"] = json!("");
        assert!(validate_news_article(&blank_image).is_valid);
    }

    #[rstest]
    #[case("title", json!(""), "Article title is required")]
    #[case("summary", json!(null), "Article summary is required")]
    #[case("source", json!("  "), "Article source is required")]
    #[case("url", json!("ftp://example.com"), "Article URL must be a valid HTTP or HTTPS URL")]
    #[case("publishedAt", json!("invalid-date"), "Article published date is required and must be a valid Date")]
    #[case("imageUrl", json!("invalid-url"), "Article image URL must be a valid HTTP or HTTPS URL")]
    #[case("imageUrl", json!(5), "Article image URL must be a string")]
    fn test_invalid_news_article(#[case] key: &str, #[case] value: Value, #[case] message: &str) {
        let mut candidate = article();
        candidate[key] = value;

        let report = validate_news_article(&candidate);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![message]);
    }

    #[test]
    fn test_non_object_article() {
        let report = validate_news_article(&json!(null));
        assert_eq!(report.errors, vec!["Article must be an object"]);
    }

    #[test]
    fn test_sanitize_news_article() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let draft = sanitize_news_article(
            &json!({
                "title": "  Test Article  ",
                "summary": "  Summary  ",
                "source": " Source ",
                "url": " https://example.com/a ",
                "publishedAt": "2023-01-01T12:00:00Z",
            }),
            now,
        );

        assert_eq!(draft.title, "Test Article");
        assert_eq!(draft.summary, "Summary");
        assert_eq!(draft.source, "Source");
        assert_eq!(draft.url, "https://example.com/a");
        assert_eq!(draft.image_url, "");
        assert_eq!(
            draft.published_at,
            Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap()
        );

        // sanitize defaults the date even though validation would reject it
        let draft = sanitize_news_article(&json!({ "publishedAt": "garbage" }), now);
        assert_eq!(draft.published_at, now);
        assert_eq!(draft.title, "");
    }

    fn url_text() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["", " ", "http://", "https://", "HTTPS://", "ftp://", "javascript:", "/"]),
            "[a-z0-9.:/?#@-]{0,12}",
            prop::sample::select(vec!["", " ", "\t"]),
        )
            .prop_map(|(scheme, rest, tail)| format!("{scheme}{rest}{tail}"))
    }

    fn field_value() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(Value::Null)),
            "\\s{0,2}\\PC{0,6}\\s{0,2}".prop_map(|text| Some(Value::String(text))),
            url_text().prop_map(|text| Some(Value::String(text))),
            any::<i64>().prop_map(|n| Some(json!(n))),
            any::<bool>().prop_map(|flag| Some(json!(flag))),
        ]
    }

    fn candidate(fields: [(&str, &Option<Value>); 4]) -> Value {
        let mut object = Map::new();
        for (key, value) in fields {
            if let Some(value) = value {
                object.insert(key.to_string(), value.clone());
            }
        }
        Value::Object(object)
    }

    fn non_blank(value: &Option<Value>) -> Option<&str> {
        value
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    fn web_scheme(text: &str) -> bool {
        Url::parse(text).is_ok_and(|parsed| parsed.scheme() == "http" || parsed.scheme() == "https")
    }

    proptest! {
        #[test]
        fn test_is_valid_url_matches_parser(text in url_text()) {
            prop_assert_eq!(is_valid_url(&text), web_scheme(&text));
        }

        #[test]
        fn test_sanitize_application_never_keeps_outer_whitespace(
            name in field_value(),
            url in field_value(),
            icon in field_value(),
            description in field_value(),
        ) {
            let raw = candidate([("name", &name), ("url", &url), ("icon", &icon), ("description", &description)]);
            let draft = sanitize_application(&raw);

            for (sanitized, source) in [
                (&draft.name, &name),
                (&draft.url, &url),
                (&draft.icon, &icon),
                (&draft.description, &description),
            ] {
                let expected = source.as_ref().and_then(Value::as_str).map(str::trim).unwrap_or("");
                prop_assert_eq!(sanitized.as_str(), expected);
                prop_assert_eq!(sanitized.trim(), sanitized.as_str());
            }
        }

        #[test]
        fn test_validate_application_accepts_exactly_well_formed(
            name in field_value(),
            url in field_value(),
            icon in field_value(),
            description in field_value(),
        ) {
            let raw = candidate([("name", &name), ("url", &url), ("icon", &icon), ("description", &description)]);
            let report = validate_application(&raw);

            let expected = non_blank(&name).is_some()
                && non_blank(&url).is_some_and(web_scheme)
                && description.as_ref().is_none_or(Value::is_string)
                && icon.as_ref().is_none_or(Value::is_string);

            prop_assert_eq!(report.is_valid, expected);
            prop_assert_eq!(report.is_valid, report.errors.is_empty());
        }
    }
}
