use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;
use votepaxos_core::Identity;

use super::channel::{Channel, ChannelState};
use super::socket::RealtimeSocket;
use super::{ConnectionState, RealtimeError, RpcError, VoterLink};
use crate::config::{ClientConfig, IdentitySource};
use crate::rest::{NetworkApi, RestError};

/// Picks the session identity according to `config.identity`. Only the
/// preflight source touches the network.
pub async fn resolve_identity(
    config: &ClientConfig,
    api: &dyn NetworkApi,
) -> Result<Identity, RestError> {
    match &config.identity {
        IdentitySource::Preflight => api.preflight().await,
        IdentitySource::Fixed(id) => Identity::new(id.clone()).map_err(|_| RestError::EmptyIdentity),
        IdentitySource::Generated => Identity::new(Uuid::new_v4().to_string())
            .map_err(|_| RestError::EmptyIdentity),
    }
}

/// One real-time connection plus the joined `voter:{identity}` channel.
///
/// [`VoterSession::establish`] only returns once both are ready, so holders of
/// a session never observe it half-built. A dropped connection is not
/// re-established; the state moves to [`ConnectionState::Disconnected`].
pub struct VoterSession {
    identity: Identity,
    channel: Channel,
    rpc_timeout: Duration,
}

impl VoterSession {
    pub async fn establish(config: &ClientConfig, identity: Identity) -> Result<Self, RealtimeError> {
        let url = config.realtime_url(identity.as_str());
        let socket = RealtimeSocket::connect(url.as_str(), config.heartbeat_interval).await?;
        let channel = Channel::new(socket, identity.channel_topic(), config.rpc_timeout);
        channel.join(json!({}), config.join_timeout).await?;
        info!(target: "votepaxos::realtime", identity = %identity, "realtime ready");
        Ok(Self {
            identity,
            channel,
            rpc_timeout: config.rpc_timeout,
        })
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn socket(&self) -> &RealtimeSocket {
        self.channel.socket()
    }

    /// Resolves when the underlying connection drops.
    pub async fn disconnected(&self) {
        self.channel.socket().closed().await;
    }

    pub async fn close(&self) {
        if self.channel.is_joined() {
            let _ = self.channel.leave(self.rpc_timeout).await;
        }
        self.channel.socket().close();
    }
}

#[async_trait]
impl VoterLink for VoterSession {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn connection_state(&self) -> ConnectionState {
        if !self.channel.socket().is_open() {
            return ConnectionState::Disconnected;
        }
        match self.channel.state() {
            ChannelState::Joined => ConnectionState::Ready,
            ChannelState::Joining | ChannelState::Closed => ConnectionState::Connecting,
            ChannelState::Errored | ChannelState::Leaving => ConnectionState::Disconnected,
        }
    }

    async fn send(
        &self,
        command: &str,
        payload: Value,
        timeout: Option<Duration>,
    ) -> Result<Value, RpcError> {
        self.channel.call(command, payload, timeout).await
    }
}
