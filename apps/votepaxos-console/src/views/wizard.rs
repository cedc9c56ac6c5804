//! Two-step network setup: choose the voter count, then review and apply.

use votepaxos_client::dashboard::{SetupPlan, DEFAULT_SETUP_VOTERS};
use votepaxos_core::Identity;

use crate::error::CliError;

pub const TITLE: &str = "Setup Wizard";

/// Step 1: how many simulated voters to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VotersStep {
    pub identity: Identity,
    pub is_first_time: bool,
    pub voters: u32,
}

impl VotersStep {
    pub fn new(identity: Identity, is_first_time: bool) -> Self {
        Self {
            identity,
            is_first_time,
            voters: DEFAULT_SETUP_VOTERS,
        }
    }

    pub fn intro(&self) -> Vec<String> {
        let registration = if self.is_first_time {
            "You will be registered as a non-simulated (live) voter when this network goes online."
        } else {
            "You are currently registered on the network with a unique voter ID."
        };
        vec![
            "Voters".to_string(),
            "Simulated voters are randomly assigned 'political values' and 'tolerance' and automatically vote on policies in accordance with these.".to_string(),
            "The number of voters selected here will be automatically started across the network.".to_string(),
            registration.to_string(),
            format!("Your unique ID: {}", self.identity),
        ]
    }

    pub fn prompt(&self) -> String {
        format!("Simulated Voters [{}]: ", self.voters)
    }

    /// Applies typed input. Blank input keeps the current value.
    pub fn set_voters(&mut self, input: &str) -> Result<(), CliError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(());
        }
        self.voters = input.parse().map_err(|_| {
            CliError::InvalidArgument(format!(
                "'{input}' is not a valid number of voters (whole numbers from 0)"
            ))
        })?;
        Ok(())
    }

    pub fn review(self) -> ApplyChangesStep {
        ApplyChangesStep {
            identity: self.identity,
            is_first_time: self.is_first_time,
            voters: self.voters,
        }
    }
}

/// Step 2: what finishing the wizard will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyChangesStep {
    pub identity: Identity,
    pub is_first_time: bool,
    pub voters: u32,
}

impl ApplyChangesStep {
    pub fn review_lines(&self) -> Vec<String> {
        let mut lines = vec![if self.voters > 0 {
            format!("- {} simulated voter(s) will be spawned...", self.voters)
        } else {
            "- No simulated voters will be spawned.".to_string()
        }];
        if self.is_first_time {
            lines.push(format!(
                "- You will be connected to the network as {}",
                self.identity
            ));
        }
        lines
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            "Apply Changes".to_string(),
            "Please review the following changes. They will be enacted immediately when you confirm 'Finish Setup'.".to_string(),
        ];
        lines.extend(self.review_lines());
        lines.join("\n")
    }

    pub fn plan(&self) -> SetupPlan {
        SetupPlan {
            voters: self.voters,
        }
    }
}
