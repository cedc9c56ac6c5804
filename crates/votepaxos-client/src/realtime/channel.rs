use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::protocol::{Frame, EVENT_JOIN, EVENT_LEAVE};
use super::socket::RealtimeSocket;
use super::{PushReply, RealtimeError, RpcError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Joining,
    Joined,
    Errored,
    Leaving,
}

/// A named topic on the shared socket.
pub struct Channel {
    socket: RealtimeSocket,
    topic: String,
    default_timeout: Duration,
    join_ref: Mutex<Option<String>>,
    state: Mutex<ChannelState>,
}

impl Channel {
    pub fn new(socket: RealtimeSocket, topic: impl Into<String>, default_timeout: Duration) -> Self {
        Self {
            socket,
            topic: topic.into(),
            default_timeout,
            join_ref: Mutex::new(None),
            state: Mutex::new(ChannelState::Closed),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn socket(&self) -> &RealtimeSocket {
        &self.socket
    }

    pub fn state(&self) -> ChannelState {
        let state = *self.state.lock();
        if state == ChannelState::Joined
            && (!self.socket.is_open() || self.socket.topic_errored(&self.topic))
        {
            return ChannelState::Errored;
        }
        state
    }

    pub fn is_joined(&self) -> bool {
        self.state() == ChannelState::Joined
    }

    /// Sends `phx_join` and waits for the server to accept it.
    pub async fn join(&self, payload: Value, timeout: Duration) -> Result<Value, RealtimeError> {
        let reference = self.socket.make_ref();
        *self.state.lock() = ChannelState::Joining;
        *self.join_ref.lock() = Some(reference.clone());
        self.socket.clear_topic_error(&self.topic);

        let frame = Frame::new(self.topic.clone(), EVENT_JOIN, payload)
            .with_refs(Some(reference.clone()), Some(reference));
        match self.socket.push(frame, timeout).await {
            PushReply::Ok(response) => {
                *self.state.lock() = ChannelState::Joined;
                info!(target: "votepaxos::realtime", topic = %self.topic, "channel joined");
                Ok(response)
            }
            PushReply::Error(reason) => {
                *self.state.lock() = ChannelState::Errored;
                Err(RealtimeError::JoinRejected {
                    topic: self.topic.clone(),
                    reason,
                })
            }
            PushReply::Timeout => {
                *self.state.lock() = ChannelState::Errored;
                Err(if self.socket.is_open() {
                    RealtimeError::JoinTimeout {
                        topic: self.topic.clone(),
                    }
                } else {
                    RealtimeError::Closed
                })
            }
        }
    }

    /// Pushes `event` and reports the server's reply. There is no way to
    /// cancel a push once sent; it resolves on reply or timeout.
    pub async fn push(&self, event: &str, payload: Value, timeout: Option<Duration>) -> PushReply {
        if !self.is_joined() {
            debug!(target: "votepaxos::realtime", topic = %self.topic, %event, "push on unjoined channel");
            return PushReply::Error(json!("channel is not joined"));
        }
        let join_ref = self.join_ref.lock().clone();
        let frame = Frame::new(self.topic.clone(), event, payload).with_refs(join_ref, None);
        self.socket
            .push(frame, timeout.unwrap_or(self.default_timeout))
            .await
    }

    /// Request/response wrapper over [`Channel::push`]: the acknowledgement
    /// payload on `ok`, an [`RpcError`] on either `error` or timeout.
    pub async fn call(
        &self,
        event: &str,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, RpcError> {
        self.push(event, payload, timeout).await.into_result()
    }

    pub async fn leave(&self, timeout: Duration) -> PushReply {
        let join_ref = self.join_ref.lock().clone();
        *self.state.lock() = ChannelState::Leaving;
        let frame = Frame::new(self.topic.clone(), EVENT_LEAVE, json!({})).with_refs(join_ref, None);
        let reply = self.socket.push(frame, timeout).await;
        *self.state.lock() = ChannelState::Closed;
        debug!(target: "votepaxos::realtime", topic = %self.topic, "channel left");
        reply
    }
}
