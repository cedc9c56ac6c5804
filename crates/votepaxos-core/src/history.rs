//! Decoding of the `get_history` reply into display rows.
//!
//! The backend reports each concluded proposal as
//! `{ "timestamp": .., "outcome": [status, ..], "policy": [tag, [x, y], description, extra] }`.

use std::fmt;

use serde_json::Value;

use crate::model::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyStatus {
    Accepted,
    Rejected,
    Aborted,
    TimedOut,
    Other(String),
}

impl PolicyStatus {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ok" | "accepted" | "decided" | "committed" => PolicyStatus::Accepted,
            "rejected" | "declined" => PolicyStatus::Rejected,
            "abort" | "aborted" => PolicyStatus::Aborted,
            "timeout" | "timed_out" => PolicyStatus::TimedOut,
            _ => PolicyStatus::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyStatus::Accepted => f.write_str("Accepted"),
            PolicyStatus::Rejected => f.write_str("Rejected"),
            PolicyStatus::Aborted => f.write_str("Aborted"),
            PolicyStatus::TimedOut => f.write_str("Timed out"),
            PolicyStatus::Other(raw) => {
                let mut chars = raw.chars();
                match chars.next() {
                    Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str().replace('_', " ")),
                    None => f.write_str("Unknown"),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub status: PolicyStatus,
    pub description: String,
    pub coordinates: Option<Coordinates>,
    pub additional_data: Value,
}

impl HistoryEntry {
    /// Formats the coordinate column as `[ x, y ]`.
    pub fn coordinates_label(&self) -> String {
        match self.coordinates {
            Some(c) => format!("[ {c} ]"),
            None => "[ ? ]".to_string(),
        }
    }

    fn from_value(entry: &Value) -> Self {
        let timestamp = match entry.get("timestamp") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let status = match entry.get("outcome") {
            Some(Value::Array(items)) => raw_status(items.first()),
            other => raw_status(other),
        };
        let policy = entry.get("policy").and_then(Value::as_array);
        let field = |index: usize| policy.and_then(|items| items.get(index));

        let coordinates = field(1)
            .and_then(|value| serde_json::from_value::<Coordinates>(value.clone()).ok());
        let description = field(2)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let additional_data = field(3).cloned().unwrap_or(Value::Null);

        Self {
            timestamp,
            status,
            description,
            coordinates,
            additional_data,
        }
    }
}

fn raw_status(value: Option<&Value>) -> PolicyStatus {
    match value {
        Some(Value::String(text)) => PolicyStatus::from_raw(text),
        Some(Value::Null) | None => PolicyStatus::Other(String::new()),
        Some(other) => PolicyStatus::Other(other.to_string()),
    }
}

/// Returns `None` when the reply is not a list of entries.
pub fn decode_history(reply: &Value) -> Option<Vec<HistoryEntry>> {
    reply
        .as_array()
        .map(|entries| entries.iter().map(HistoryEntry::from_value).collect())
}
