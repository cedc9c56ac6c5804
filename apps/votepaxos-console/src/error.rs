use std::io;

use thiserror::Error;
use votepaxos_client::{ConfigError, RealtimeError, RestError};
use votepaxos_core::ModelError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("logging initialization failed: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("preflight failed: {0}")]
    Preflight(#[from] RestError),
    #[error("realtime connection failed: {0}")]
    Realtime(#[from] RealtimeError),
    #[error("{0}")]
    Model(#[from] ModelError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Action(String),
    /// The failure was already shown to the operator as a toast.
    #[error("action failed")]
    ActionFailed,
}
