//! Display rules for the voter roster.

use crate::model::Voter;

/// Orders the roster for display: simulated voters first, other live voters
/// next, and the caller's own live identity last. Ties keep backend order.
pub fn sort_for_display(voters: &[Voter], current_identity: &str) -> Vec<Voter> {
    let mut sorted = voters.to_vec();
    sorted.sort_by(|a, b| display_rank(a, current_identity).cmp(&display_rank(b, current_identity)));
    sorted
}

fn display_rank(voter: &Voter, current_identity: &str) -> u8 {
    if voter.is_simulated {
        0
    } else if voter.id != current_identity {
        1
    } else {
        2
    }
}

/// Advisory health of the network, judged from the simulated voter count.
/// These thresholds are presentational; the backend enforces its own quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MembershipHealth {
    Insufficient,
    Low,
    Healthy,
}

pub const REQUIRED_PROCESSES: usize = 3;
pub const RECOMMENDED_PROCESSES: usize = 5;

impl MembershipHealth {
    pub fn classify(process_count: usize) -> Self {
        if process_count < REQUIRED_PROCESSES {
            MembershipHealth::Insufficient
        } else if process_count < RECOMMENDED_PROCESSES {
            MembershipHealth::Low
        } else {
            MembershipHealth::Healthy
        }
    }

    /// Callout title, or `None` when no warning is shown.
    pub fn title(self) -> Option<&'static str> {
        match self {
            MembershipHealth::Insufficient => Some("Insufficient Processes"),
            MembershipHealth::Low => Some("Low Process Count"),
            MembershipHealth::Healthy => None,
        }
    }

    /// Callout body: a lead sentence followed by bullet points.
    pub fn advisory(self, process_count: usize) -> Vec<String> {
        let recommended = format!(
            "At least {RECOMMENDED_PROCESSES} processes are recommended for the network to function as intended."
        );
        let count = format!("There's {process_count} process(es) on the network.");
        match self {
            MembershipHealth::Insufficient => vec![
                "The network does not have the number of processes required to operate correctly.".into(),
                "Some or all functionality may be disabled and data loss may have occurred:".into(),
                recommended,
                format!(
                    "At least {REQUIRED_PROCESSES} processes are required for the network to function."
                ),
                count,
            ],
            MembershipHealth::Low => vec![
                "The network has a very low process count that may degrade performance or cause the network to perform erratically or incorrectly:".into(),
                recommended,
                count,
            ],
            MembershipHealth::Healthy => Vec::new(),
        }
    }

    fn session_adjective(self) -> &'static str {
        match self {
            MembershipHealth::Insufficient => "an inactive",
            MembershipHealth::Low => "a potentially degraded",
            MembershipHealth::Healthy => "an active",
        }
    }

    pub fn status_line(simulated_count: usize) -> String {
        let health = Self::classify(simulated_count);
        format!(
            "You are connected to {} session with {simulated_count} simulated voter(s).",
            health.session_adjective()
        )
    }
}
