//! Typed commands pushed on the session's `voter:{id}` channel.

use serde_json::Value;
use votepaxos_core::{decode_history, HistoryEntry, Policy};

use crate::realtime::{RpcError, VoterLink};

pub const CMD_PROPOSE: &str = "propose";
pub const CMD_JOIN_NETWORK: &str = "join_network";
pub const CMD_LEAVE_NETWORK: &str = "leave_network";
pub const CMD_GET_HISTORY: &str = "get_history";

/// Submits `policy` to the network as-is. The outcome is not tracked here.
pub async fn propose(link: &dyn VoterLink, policy: &Policy) -> Result<Value, RpcError> {
    let payload = serde_json::to_value(policy).map_err(|err| RpcError::new(Value::String(err.to_string())))?;
    link.send(CMD_PROPOSE, payload, None).await
}

/// Registers this session as a live voter.
pub async fn join_network(link: &dyn VoterLink) -> Result<Value, RpcError> {
    link.send(CMD_JOIN_NETWORK, Value::Null, None).await
}

pub async fn leave_network(link: &dyn VoterLink) -> Result<Value, RpcError> {
    link.send(CMD_LEAVE_NETWORK, Value::Null, None).await
}

/// Concluded proposals, or `None` when the backend replies with something
/// other than a list.
pub async fn get_history(link: &dyn VoterLink) -> Result<Option<Vec<HistoryEntry>>, RpcError> {
    let reply = link.send(CMD_GET_HISTORY, Value::Null, None).await?;
    Ok(decode_history(&reply))
}
