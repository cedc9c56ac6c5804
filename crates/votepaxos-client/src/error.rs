use serde_json::Value;
use thiserror::Error;

use crate::realtime::{RealtimeError, RpcError};
use crate::rest::{parse_body, RestError};

/// Failure of a user-triggered action, classified for display.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Raised locally, e.g. when there is nothing to perform.
    #[error("{0}")]
    InvalidAction(String),
    /// The backend answered with an error payload (RPC error/timeout or a
    /// non-2xx HTTP body).
    #[error("backend rejected the request: {data}")]
    Remote { data: Value },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ActionError {
    /// Message shown to the operator. Precedence: local invalid-action text,
    /// then the backend's error data when it carries any, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ActionError::InvalidAction(message) => message.clone(),
            ActionError::Remote { data } => match data {
                Value::Null | Value::Bool(false) => fallback.to_string(),
                Value::String(text) if text.is_empty() => fallback.to_string(),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
            ActionError::Other(_) => fallback.to_string(),
        }
    }
}

impl From<RpcError> for ActionError {
    fn from(err: RpcError) -> Self {
        ActionError::Remote {
            data: err.response.data,
        }
    }
}

impl From<RestError> for ActionError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::UnexpectedStatus { body, .. } => ActionError::Remote {
                data: parse_body(&body),
            },
            other => ActionError::Other(other.into()),
        }
    }
}

impl From<RealtimeError> for ActionError {
    fn from(err: RealtimeError) -> Self {
        ActionError::Other(err.into())
    }
}
