//! Serde helpers for `DateTime<Utc>` fields.
//!
//! Always writes RFC 3339. Reads anything [`parse_timestamp`] accepts, so
//! files with naive ISO timestamps load as UTC.

use chrono::{DateTime, Utc};
use serde::{self, Deserialize, Deserializer, Serializer};

use super::time_utils::parse_timestamp;

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "Invalid timestamp format: {}. Expected ISO 8601/RFC3339 or YYYY-MM-DD",
            s
        ))
    })
}
