//! Real-time connection to the backend.
//!
//! One WebSocket per session ([`socket`]), one joined `voter:{id}` channel on
//! it ([`channel`]), and the [`VoterSession`] that ties both to the session
//! identity and exposes them through [`VoterLink`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use votepaxos_core::Identity;

pub mod channel;
pub mod protocol;
pub mod session;
pub mod socket;

pub use channel::Channel;
pub use session::{resolve_identity, VoterSession};
pub use socket::RealtimeSocket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Ready,
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Disconnected => "disconnected",
        })
    }
}

/// Outcome of a single channel push. Exactly one is produced per push.
#[derive(Debug, Clone, PartialEq)]
pub enum PushReply {
    Ok(Value),
    Error(Value),
    Timeout,
}

impl PushReply {
    /// Collapses the two failure outcomes into the same [`RpcError`] shape.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            PushReply::Ok(response) => Ok(response),
            PushReply::Error(data) => Err(RpcError::new(data)),
            PushReply::Timeout => Err(RpcError::new(Value::Null)),
        }
    }
}

/// Normalised RPC failure, `{ "response": { "data": .. } }`. An error reply
/// and a timeout (`data: null`) are the same type to the caller.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("rpc failed: {}", .response.data)]
pub struct RpcError {
    pub response: RpcErrorResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorResponse {
    pub data: Value,
}

impl RpcError {
    pub fn new(data: Value) -> Self {
        Self {
            response: RpcErrorResponse { data },
        }
    }

    pub fn data(&self) -> &Value {
        &self.response.data
    }
}

#[derive(Debug, Error)]
pub enum RealtimeError {
    #[error("websocket connect to {url} failed: {reason}")]
    Connect { url: String, reason: String },
    #[error("joining {topic} was rejected: {reason}")]
    JoinRejected { topic: String, reason: Value },
    #[error("joining {topic} timed out")]
    JoinTimeout { topic: String },
    #[error("realtime connection closed")]
    Closed,
}

/// What the rest of the client needs from a live session.
#[async_trait]
pub trait VoterLink: Send + Sync {
    fn identity(&self) -> &Identity;

    fn connection_state(&self) -> ConnectionState;

    /// Push `command` on the session's channel and wait for its reply.
    /// `timeout` falls back to the session default.
    async fn send(
        &self,
        command: &str,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, RpcError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test_timeout::timeout]
    fn error_and_timeout_share_one_shape() {
        let from_error = PushReply::Error(json!("boom")).into_result().unwrap_err();
        let from_timeout = PushReply::Timeout.into_result().unwrap_err();
        assert_eq!(
            serde_json::to_value(&from_error).unwrap(),
            json!({"response": {"data": "boom"}})
        );
        assert_eq!(
            serde_json::to_value(&from_timeout).unwrap(),
            json!({"response": {"data": null}})
        );
        assert_eq!(
            PushReply::Ok(json!({"accepted": true})).into_result(),
            Ok(json!({"accepted": true}))
        );
    }
}
