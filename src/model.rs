//! Technician and task records.
//!
//! Both record types are stored as flat JSON objects. Timestamps are written
//! as RFC 3339 UTC strings; readers also accept naive ISO-8601 timestamps
//! (no offset), which are taken as UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_DONE: &str = "Done";

/// Display name used when a task references a technician that doesn't exist.
pub const UNKNOWN_TECHNICIAN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Technician {
    /// Case-insensitive name comparison used for upserts.
    pub fn matches_name(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub technician_id: u64,
    pub description: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub done: bool,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn status_label(&self) -> &'static str {
        if self.done {
            STATUS_DONE
        } else {
            STATUS_PENDING
        }
    }

    /// Done tasks completed at or after `cutoff`.
    pub fn completed_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.done && self.completed_at.is_some_and(|at| at >= cutoff)
    }
}

/// Next id under the `max + 1` rule (1 for an empty collection).
pub fn next_id(ids: impl Iterator<Item = u64>) -> crate::error::Result<u64> {
    let max = ids.max().unwrap_or(0);
    max.checked_add(1).ok_or_else(|| {
        crate::error::Error::Backend(format!("no id left after {max}; stored ids are exhausted"))
    })
}

/// Trim and reject blank required text.
pub fn required_text(value: &str, field: &str) -> crate::error::Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::Validation(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Serde helpers for stored timestamps.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    pub mod option {
        use super::{format, parse};
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(ts) => serializer.serialize_some(&format(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
            }
        }
    }
}
