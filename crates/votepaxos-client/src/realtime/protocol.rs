//! Phoenix channel frames (serializer v2).
//!
//! Every text frame is a JSON array `[join_ref, ref, topic, event, payload]`.

use serde_json::{json, Value};
use thiserror::Error;

pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const PHOENIX_TOPIC: &str = "phoenix";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame must be a 5 element array")]
    Shape,
    #[error("frame field '{0}' has the wrong type")]
    Field(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub join_ref: Option<String>,
    pub reference: Option<String>,
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

impl Frame {
    pub fn new(topic: impl Into<String>, event: impl Into<String>, payload: Value) -> Self {
        Self {
            join_ref: None,
            reference: None,
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }

    pub fn with_refs(mut self, join_ref: Option<String>, reference: Option<String>) -> Self {
        self.join_ref = join_ref;
        self.reference = reference;
        self
    }

    pub fn heartbeat(reference: String) -> Self {
        Self::new(PHOENIX_TOPIC, EVENT_HEARTBEAT, json!({})).with_refs(None, Some(reference))
    }

    pub fn encode(&self) -> String {
        json!([
            self.join_ref,
            self.reference,
            self.topic,
            self.event,
            self.payload
        ])
        .to_string()
    }

    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;
        let mut items = match value {
            Value::Array(items) if items.len() == 5 => items.into_iter(),
            _ => return Err(FrameError::Shape),
        };
        // Length checked above.
        let mut next = || items.next().unwrap_or(Value::Null);
        let join_ref = optional_ref(next(), "join_ref")?;
        let reference = optional_ref(next(), "ref")?;
        let topic = required_string(next(), "topic")?;
        let event = required_string(next(), "event")?;
        let payload = next();
        Ok(Self {
            join_ref,
            reference,
            topic,
            event,
            payload,
        })
    }

    /// Splits a `phx_reply` payload into its status and response.
    pub fn reply_parts(&self) -> Option<(&str, &Value)> {
        if self.event != EVENT_REPLY {
            return None;
        }
        let status = self.payload.get("status")?.as_str()?;
        let response = self.payload.get("response").unwrap_or(&Value::Null);
        Some((status, response))
    }
}

fn optional_ref(value: Value, field: &'static str) -> Result<Option<String>, FrameError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(FrameError::Field(field)),
    }
}

fn required_string(value: Value, field: &'static str) -> Result<String, FrameError> {
    match value {
        Value::String(text) => Ok(text),
        _ => Err(FrameError::Field(field)),
    }
}
