//! Asynchronous client for the VotePaxos backend.
//!
//! The backend owns all consensus logic. This crate wraps its HTTP endpoints
//! ([`rest`]), its Phoenix real-time channel ([`realtime`], [`rpc`]), and the
//! small amount of client state an operator console needs ([`store`],
//! [`dashboard`]). Every user-facing action goes through
//! [`notify::perform_then_notify`] so it ends in exactly one toast.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod realtime;
pub mod rest;
pub mod rpc;
pub mod store;

pub use config::{ClientConfig, ConfigError, IdentitySource};
pub use dashboard::{Dashboard, SetupPlan};
pub use error::ActionError;
pub use notify::{perform_then_notify, Intent, NotifyOptions, RecordingToaster, Toast, Toaster};
pub use realtime::{ConnectionState, PushReply, RealtimeError, RpcError, VoterLink, VoterSession};
pub use rest::{NetworkApi, NetworkClient, RestError};
pub use store::{RosterSnapshot, RosterStore};
