// Lenient timestamp parsing for untyped input
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Parse a timestamp the way browsers accept them: RFC 3339, RFC 2822
/// (RSS `pubDate`), bare ISO dates and integer epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_timestamp_str(text),
        Value::Number(number) => number.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_common_shapes() {
        let noon = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();

        assert_eq!(parse_timestamp(&json!("2023-01-01T12:00:00Z")), Some(noon));
        assert_eq!(parse_timestamp(&json!("2023-01-01T14:00:00+02:00")), Some(noon));
        assert_eq!(parse_timestamp(&json!("Sun, 01 Jan 2023 12:00:00 GMT")), Some(noon));
        assert_eq!(parse_timestamp(&json!("2023-01-01T12:00:00")), Some(noon));
        assert_eq!(parse_timestamp(&json!(noon.timestamp_millis())), Some(noon));
        assert_eq!(
            parse_timestamp(&json!("2023-01-01")),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("invalid-date")), None);
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!({"date": "2023-01-01"})), None);
    }
}
