//! Operator actions, each ending in one toast and a roster re-fetch.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use votepaxos_core::{HistoryEntry, Identity, Policy, VoterData};

use crate::error::ActionError;
use crate::notify::{perform_then_notify, NotifyOptions, Toast, Toaster};
use crate::realtime::{ConnectionState, VoterLink};
use crate::rest::NetworkApi;
use crate::rpc;
use crate::store::RosterStore;

pub const DEFAULT_SETUP_VOTERS: u32 = 5;

/// Choices collected by the setup wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupPlan {
    pub voters: u32,
}

impl Default for SetupPlan {
    fn default() -> Self {
        Self {
            voters: DEFAULT_SETUP_VOTERS,
        }
    }
}

pub struct Dashboard {
    api: Arc<dyn NetworkApi>,
    link: Arc<dyn VoterLink>,
    roster: Arc<RosterStore>,
    toaster: Arc<dyn Toaster>,
    connected: AtomicBool,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn NetworkApi>,
        link: Arc<dyn VoterLink>,
        roster: Arc<RosterStore>,
        toaster: Arc<dyn Toaster>,
    ) -> Self {
        Self {
            api,
            link,
            roster,
            toaster,
            connected: AtomicBool::new(false),
        }
    }

    pub fn identity(&self) -> &Identity {
        self.link.identity()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.link.connection_state()
    }

    pub fn roster(&self) -> &Arc<RosterStore> {
        &self.roster
    }

    /// Set optimistically once `join_network` succeeds; not confirmed by
    /// the backend afterwards.
    pub fn is_connected_to_network(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Awaits `but_first`, then re-fetches the roster and hands back the
    /// action's value. A failed action skips the re-fetch.
    pub async fn refresh_dash<T, Fut>(&self, but_first: Fut) -> Result<T, ActionError>
    where
        Fut: Future<Output = Result<T, ActionError>>,
    {
        let value = but_first.await?;
        self.roster.fetch(self.api.as_ref()).await?;
        Ok(value)
    }

    /// Plain re-fetch; no toast.
    pub async fn refresh(&self) -> Result<VoterData, ActionError> {
        Ok(self.roster.fetch(self.api.as_ref()).await?)
    }

    pub async fn spawn_one(&self) -> Toast {
        self.spawn(1).await
    }

    pub async fn spawn(&self, count: u32) -> Toast {
        let success = if count == 1 {
            "Successfully spawned a new voter.".to_string()
        } else {
            format!("Successfully spawned {count} new voters.")
        };
        let options = NotifyOptions::new(success);
        perform_then_notify(
            self.toaster.as_ref(),
            Some(move || {
                self.refresh_dash(async move {
                    Ok::<_, ActionError>(self.api.spawn_voters(count).await?)
                })
            }),
            &options,
        )
        .await
    }

    pub async fn kill(&self, id: &str) -> Toast {
        let options = NotifyOptions::new("Terminated voter.");
        perform_then_notify(
            self.toaster.as_ref(),
            Some(move || {
                self.refresh_dash(async move { Ok::<_, ActionError>(self.api.kill_voter(id).await?) })
            }),
            &options,
        )
        .await
    }

    pub async fn propose(&self, policy: &Policy) -> Toast {
        let options = NotifyOptions::new("Successfully proposed your selected policy!")
            .with_failure("There was a problem proposing your selected policy.");
        perform_then_notify(
            self.toaster.as_ref(),
            Some(move || {
                self.refresh_dash(async move {
                    info!(target: "votepaxos::dashboard", policy = %policy.description, "proposing");
                    Ok::<_, ActionError>(rpc::propose(self.link.as_ref(), policy).await?)
                })
            }),
            &options,
        )
        .await
    }

    /// Leaves the network and terminates every process. The connected flag is
    /// cleared whatever the outcome.
    pub async fn destroy_network(&self) -> Toast {
        let options = NotifyOptions::new("All processes have been successfully terminated.");
        let toast = perform_then_notify(
            self.toaster.as_ref(),
            Some(move || {
                self.refresh_dash(async move {
                    rpc::leave_network(self.link.as_ref()).await?;
                    Ok::<_, ActionError>(self.api.kill_all_voters().await?)
                })
            }),
            &options,
        )
        .await;
        self.set_connected(false);
        toast
    }

    /// Spawns the planned voters and, on the first run, joins the network
    /// as this session's identity.
    pub async fn finish_setup(&self, plan: SetupPlan) -> Toast {
        let options = NotifyOptions::new("Network successfully prepared!")
            .with_failure("There was a problem setting up the network.");
        let first_time = !self.is_connected_to_network();
        perform_then_notify(
            self.toaster.as_ref(),
            Some(move || async move {
                let spawned = self.api.spawn_voters(plan.voters).await?;
                if first_time {
                    let reply = rpc::join_network(self.link.as_ref()).await?;
                    debug!(target: "votepaxos::dashboard", ?reply, "joined network");
                    self.set_connected(true);
                }
                self.refresh().await?;
                Ok::<Value, ActionError>(spawned)
            }),
            &options,
        )
        .await
    }

    /// Joins the network once simulated voters exist. Returns whether a
    /// join happened on this call.
    pub async fn ensure_joined(&self) -> Result<bool, ActionError> {
        if self.is_connected_to_network() || self.roster.simulated_voter_count() == 0 {
            return Ok(false);
        }
        let reply = rpc::join_network(self.link.as_ref()).await?;
        info!(target: "votepaxos::dashboard", ?reply, "joined network");
        self.set_connected(true);
        self.refresh().await?;
        Ok(true)
    }

    pub async fn history(&self) -> Result<Option<Vec<HistoryEntry>>, ActionError> {
        Ok(rpc::get_history(self.link.as_ref()).await?)
    }
}
