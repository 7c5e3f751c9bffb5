//! Lenient timestamp parsing for backend payloads.
//!
//! The backend emits naive UTC timestamps (`2024-05-01T10:00:00.123456`)
//! without an offset. Values are accepted in RFC 3339 or naive form and are
//! always written back as RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a timestamp in RFC 3339 or naive (assumed UTC) form.
#[must_use]
pub fn parse_lenient(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `serde(with = ...)` adapter for `Option<DateTime<Utc>>` fields.
pub mod option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_some(&at.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Unparseable values become `None` rather than failing the whole payload.
    ///
    /// # Errors
    ///
    /// Returns an error only when the field is not a string or null.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(super::parse_lenient))
    }
}
