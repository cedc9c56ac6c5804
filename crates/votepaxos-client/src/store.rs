use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use tracing::debug;
use votepaxos_core::{Voter, VoterData};

use crate::rest::{NetworkApi, RestError};

/// The last roster fetched from the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub data: VoterData,
    /// Bumped on every successful replace; 0 means nothing was fetched yet.
    pub generation: u64,
    pub fetched_at: Option<SystemTime>,
}

/// Process-wide roster cache. Starts empty and is only ever replaced
/// wholesale by a successful fetch.
#[derive(Debug, Default)]
pub struct RosterStore {
    inner: RwLock<RosterSnapshot>,
}

impl RosterStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        self.inner.read().clone()
    }

    pub fn voters(&self) -> Vec<Voter> {
        self.inner.read().data.voters.clone()
    }

    pub fn voter_count(&self) -> usize {
        self.inner.read().data.voters.len()
    }

    pub fn simulated_voter_count(&self) -> usize {
        self.inner.read().data.simulated_count()
    }

    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    pub fn replace(&self, data: VoterData) -> u64 {
        let mut guard = self.inner.write();
        guard.generation += 1;
        guard.data = data;
        guard.fetched_at = Some(SystemTime::now());
        guard.generation
    }

    /// Re-fetches the roster. On failure the cached copy is left as it was.
    pub async fn fetch(&self, api: &dyn NetworkApi) -> Result<VoterData, RestError> {
        let data = api.refresh().await?;
        let generation = self.replace(data.clone());
        debug!(
            target: "votepaxos::store",
            generation,
            voters = data.voters.len(),
            "roster replaced"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testing::StubApi;
    use votepaxos_core::Coordinates;

    fn roster(ids: &[&str]) -> VoterData {
        VoterData {
            voters: ids
                .iter()
                .map(|id| Voter::simulated(*id, Coordinates::new(1.0, 2.0), 3.0))
                .collect(),
        }
    }

    #[test_timeout::timeout]
    fn starts_empty() {
        let store = RosterStore::new();
        assert_eq!(store.generation(), 0);
        assert_eq!(store.voter_count(), 0);
        assert!(store.snapshot().fetched_at.is_none());
    }

    #[test_timeout::tokio_timeout_test]
    async fn fetch_replaces_wholesale() {
        let api = StubApi::new();
        api.queue_roster(roster(&["a", "b", "c"]));
        api.queue_roster(VoterData {
            voters: vec![Voter::live("me")],
        });
        let store = RosterStore::new();

        store.fetch(&api).await.unwrap();
        assert_eq!(store.voter_count(), 3);
        assert_eq!(store.simulated_voter_count(), 3);

        store.fetch(&api).await.unwrap();
        assert_eq!(store.voters(), vec![Voter::live("me")]);
        assert_eq!(store.simulated_voter_count(), 0);
        assert_eq!(store.generation(), 2);
    }

    #[test_timeout::tokio_timeout_test]
    async fn failed_fetch_keeps_previous_roster() {
        let api = StubApi::new();
        api.queue_roster(roster(&["a"]));
        api.queue_roster_failure("backend down");
        let store = RosterStore::new();

        store.fetch(&api).await.unwrap();
        let before = store.snapshot();
        assert!(store.fetch(&api).await.is_err());
        assert_eq!(store.snapshot(), before);
    }
}
