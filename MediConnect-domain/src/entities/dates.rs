//! Lenient date handling for medication sub-documents.
//!
//! Clients send either full RFC 3339 timestamps or plain `YYYY-MM-DD`
//! dates; a plain date is taken as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date
pub fn parse_flexible_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid date '{}', expected RFC 3339 or YYYY-MM-DD", raw))
}

/// serde helper for `Option<DateTime<Utc>>` fields
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_flexible_date(&raw).map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_flexible_date("2023-10-26T08:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 26, 6, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_plain_date_is_utc_midnight() {
        let parsed = parse_flexible_date("2023-10-26").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 10, 26, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_flexible_date("last tuesday").unwrap_err();
        assert!(err.contains("last tuesday"));
    }
}
