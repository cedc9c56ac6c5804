//! Plain-text renderings of dashboard state. Pure functions of their inputs;
//! printing is left to the caller.

pub mod banner;
pub mod history;
pub mod policies;
pub mod roster;
pub mod table;
pub mod wizard;

pub use banner::{render_health, render_status, CONNECTING, INITIALIZING};
pub use history::render_history;
pub use policies::render_policies;
pub use roster::render_roster;
pub use wizard::VotersStep;
