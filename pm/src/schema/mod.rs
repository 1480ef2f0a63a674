//! Stage output records
//!
//! Every stage produces exactly one of these records. External JSON only
//! becomes a record through [`decode`], so a response that is missing fields,
//! carries the wrong types or an unknown enumerated value never reaches the
//! rest of the pipeline.
//!
//! Cross-field expectations that the planning agents are asked to honor but
//! that are not part of the record shape (an epic's phase being one of the
//! roadmap phases, `total_sprints` matching the sprint list) are reported as
//! [`Finding`]s. They never reject or alter a record. Dates stay the strings
//! the model wrote; one that cannot be read as a date is a finding too.

mod calendar;
mod project;
mod roadmap;
mod session;

pub use calendar::{CalendarEvent, CalendarPlan};
pub use project::{ProjectInputData, TeamMember};
pub use roadmap::{Epic, ProjectRoadmap, Story};
pub use session::{EventFrequency, SessionEvent, SessionEventType, SessionPlan, Sprint};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors turning external JSON into a record
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{record} does not match its schema: {source}")]
    Decode {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A soft consistency note about a decoded record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Where in the record the note applies (e.g. `epics[2].phase`)
    pub path: String,
    pub message: String,
}

impl Finding {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A typed stage output
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Record name used in errors and logs
    const NAME: &'static str;

    /// JSON schema handed to the model as the output tool's input schema
    fn json_schema() -> serde_json::Value;

    /// Soft consistency checks; empty when nothing looks off
    fn findings(&self) -> Vec<Finding> {
        Vec::new()
    }
}

/// Decode and validate an external JSON value into a record
pub fn decode<T: Record>(value: serde_json::Value) -> Result<T, SchemaError> {
    debug!(record = T::NAME, "decode: called");
    serde_json::from_value(value).map_err(|source| SchemaError::Decode {
        record: T::NAME,
        source,
    })
}

pub(crate) fn string_array(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description,
    })
}

pub(crate) fn check_non_negative(findings: &mut Vec<Finding>, path: String, value: f64) {
    if !value.is_finite() || value < 0.0 {
        findings.push(Finding::new(path, format!("expected a non-negative number, got {}", value)));
    }
}

/// Read a model-written date: `YYYY-MM-DD`, optionally followed by a time
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Note unreadable dates and an end before the start
pub(crate) fn check_date_range(findings: &mut Vec<Finding>, prefix: &str, start: &str, end: &str) {
    let start_date = parse_date(start);
    let end_date = parse_date(end);
    if start_date.is_none() {
        findings.push(Finding::new(
            format!("{}start_date", prefix),
            format!("'{}' is not a recognizable date", start),
        ));
    }
    if end_date.is_none() {
        findings.push(Finding::new(
            format!("{}end_date", prefix),
            format!("'{}' is not a recognizable date", end),
        ));
    }
    if let (Some(s), Some(e)) = (start_date, end_date)
        && e < s
    {
        findings.push(Finding::new(
            format!("{}end_date", prefix),
            format!("end date {} is before start date {}", end, start),
        ));
    }
}

/// Deserialize an integer field, also accepting whole-number floats like `15.0`
pub(crate) fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let value = match number.as_i64() {
        Some(i) => i,
        None => match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => f as i64,
            _ => return Err(D::Error::custom(format!("expected a whole number, got {}", number))),
        },
    };
    T::try_from(value).map_err(|_| D::Error::custom(format!("{} is out of range", value)))
}
