//! Shared primitives for the VotePaxos operator console: the voter and policy
//! model returned by the backend, plus the pure display rules (ideology labels,
//! roster ordering, membership health) every front end renders the same way.

pub mod error;
pub mod history;
pub mod ideology;
pub mod model;
pub mod policy;
pub mod roster;

pub use error::ModelError;
pub use history::{decode_history, HistoryEntry, PolicyStatus};
pub use ideology::{describe_coordinates, AxisLabels, IdeologyLabels};
pub use model::{format_number, Coordinates, Identity, Policy, Simulation, Voter, VoterData};
pub use policy::{default_policies, filter_policies, find_policy};
pub use roster::{sort_for_display, MembershipHealth};
