//! Date and time conversions for the schedule wire format.
//!
//! Dates travel as `YYYY-MM-DD`, times as 24-hour `HH:MM`. The backend
//! sometimes sends full timestamps or `HH:MM:SS`; both are accepted on read.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::schedule::TimeOfDay;

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse the date part of "2026-02-09" or "2026-02-09T00:00:00.000Z".
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse "09:00" or "09:00:00" into a time of day.
pub fn parse_wire_time(value: &str) -> Option<TimeOfDay> {
    let mut parts = value.trim().split(':');
    let hour = parts.next()?.parse::<u32>().ok()?;
    let minute = parts.next()?.get(..2)?.parse::<u32>().ok()?;
    TimeOfDay::from_hm(hour, minute).ok()
}

/// Accepts ids sent either as strings or as numbers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id: {}", other))),
    }
}

pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("unexpected id: {}", other))),
    }
}
