//! Tolerant decoding helpers for backend payloads.
//!
//! The backend is not consistent about shapes: dates arrive as ISO strings or
//! epoch milliseconds, seat lists as arrays or comma-separated strings, and
//! collection endpoints may answer with something that is not an array at all.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a collection response.
///
/// Anything that is not a JSON array (object, string, null) is an empty
/// collection.
///
/// # Errors
///
/// Returns an error if the value is an array whose elements do not decode as `T`.
pub fn normalize_collection<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(items) => items.into_iter().map(serde_json::from_value).collect(),
        _ => Ok(Vec::new()),
    }
}

/// Split a comma-separated seat string (`"A1, A2,,B5"`) into trimmed identifiers.
#[must_use]
pub fn split_seats(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a date from any of the formats the backend emits.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Millis(i64),
}

/// Serde adapter: optional date from ISO text or epoch milliseconds.
///
/// Unparseable values decode as `None` rather than failing the whole payload.
///
/// # Errors
///
/// Returns an error only if the value is neither a string, a number nor null.
pub fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawDate>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDate::Text(text)) => parse_date(&text),
        Some(RawDate::Millis(ms)) => DateTime::from_timestamp_millis(ms).map(|ts| ts.date_naive()),
        None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSeats {
    List(Vec<String>),
    Joined(String),
}

/// Serde adapter: seat list from a JSON array or a comma-separated string.
///
/// # Errors
///
/// Returns an error if the value is neither an array of strings, a string nor null.
pub fn flexible_seats<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawSeats>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawSeats::List(seats)) => seats
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(RawSeats::Joined(joined)) => split_seats(&joined),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Wire {
        #[serde(default, deserialize_with = "flexible_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "flexible_seats")]
        seats: Vec<String>,
    }

    #[test]
    fn non_array_collections_are_empty() {
        let objects: Vec<u32> = normalize_collection(json!({"error": "boom"})).unwrap();
        assert!(objects.is_empty());
        let text: Vec<u32> = normalize_collection(json!("")).unwrap();
        assert!(text.is_empty());
        let null: Vec<u32> = normalize_collection(Value::Null).unwrap();
        assert!(null.is_empty());
        let numbers: Vec<u32> = normalize_collection(json!([1, 2])).unwrap();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn malformed_array_elements_fail() {
        let result: Result<Vec<u32>, _> = normalize_collection(json!(["x"]));
        assert!(result.is_err());
    }

    #[test]
    fn split_seats_trims_and_drops_blanks() {
        assert_eq!(split_seats(" A1, A2,,B5 ,"), vec!["A1", "A2", "B5"]);
        assert!(split_seats("  ").is_empty());
    }

    #[test]
    fn dates_accept_backend_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15"), Some(expected));
        assert_eq!(parse_date("2024-03-15T10:00:00Z"), Some(expected));
        assert_eq!(parse_date("2024-03-15T00:00:00.000+0000"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn decodes_millis_and_joined_seats() {
        let decoded: Wire =
            serde_json::from_value(json!({"date": 1_710_460_800_000_i64, "seats": "A1,A2"})).unwrap();
        assert_eq!(decoded.date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(decoded.seats, vec!["A1", "A2"]);
    }

    #[test]
    fn tolerates_missing_and_null() {
        let decoded: Wire = serde_json::from_value(json!({"date": null})).unwrap();
        assert_eq!(decoded.date, None);
        assert!(decoded.seats.is_empty());

        let decoded: Wire = serde_json::from_value(json!({"seats": ["B1", " "]})).unwrap();
        assert_eq!(decoded.seats, vec!["B1"]);
    }
}
