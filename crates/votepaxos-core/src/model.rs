use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ModelError;

/// Opaque per-session identity. Scopes the `voter:{id}` sub-channel and stays
/// the same for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the per-identity channel used for all RPC traffic.
    pub fn channel_topic(&self) -> String {
        format!("voter:{}", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point on the two-axis ideology plane. Each axis nominally spans [-10, 10].
/// Serialised as a two-element array `[economic, social]`; whole values go
/// out as JSON integers.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[f64; 2]")]
pub struct Coordinates {
    pub economic: f64,
    pub social: f64,
}

impl Coordinates {
    pub const fn new(economic: f64, social: f64) -> Self {
        Self { economic, social }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([economic, social]: [f64; 2]) -> Self {
        Self { economic, social }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(value: Coordinates) -> Self {
        [value.economic, value.social]
    }
}

impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [Axis(self.economic), Axis(self.social)].serialize(serializer)
    }
}

/// Largest magnitude an `f64` holds with integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

struct Axis(f64);

impl Serialize for Axis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}",
            format_number(self.economic),
            format_number(self.social)
        )
    }
}

/// Renders a number the way the dashboard always has: integral values without
/// a fractional part, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub coordinates: Coordinates,
    pub tolerance: f64,
}

/// One addressable participant of the voting network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    pub id: String,
    #[serde(default)]
    pub is_simulated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation: Option<Simulation>,
}

impl Voter {
    pub fn live(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_simulated: false,
            simulation: None,
        }
    }

    pub fn simulated(id: impl Into<String>, coordinates: Coordinates, tolerance: f64) -> Self {
        Self {
            id: id.into(),
            is_simulated: true,
            simulation: Some(Simulation {
                coordinates,
                tolerance,
            }),
        }
    }
}

/// Body of `GET /api/refresh`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoterData {
    #[serde(default)]
    pub voters: Vec<Voter>,
}

impl VoterData {
    pub fn simulated_count(&self) -> usize {
        self.voters.iter().filter(|v| v.is_simulated).count()
    }
}

/// A proposal submitted to the network for a vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub description: String,
    pub coordinates: Coordinates,
}

impl Policy {
    pub fn new(description: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            description: description.into(),
            coordinates,
        }
    }
}
