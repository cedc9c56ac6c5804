use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("no policy matches '{0}'")]
    UnknownPolicy(String),
    #[error("'{query}' matches {count} policies; be more specific")]
    AmbiguousPolicy { query: String, count: usize },
    #[error("policy index {index} is out of range (1..={len})")]
    PolicyIndexOutOfRange { index: usize, len: usize },
    #[error("identity must not be empty")]
    EmptyIdentity,
}
