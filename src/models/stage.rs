//! Procedure stages, configuration flags and the derived observation status.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default procedure of the reduction pipeline, in execution order
pub const DEFAULT_PROCEDURE: [&str; 7] = [
    "configuration",
    "preprocess",
    "astrometry",
    "single_photometry",
    "combine",
    "combined_photometry",
    "subtraction",
];

pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_INITIALIZED: &str = "initialized";

/// Ordered sequence of named pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcedureStageList(Vec<String>);

impl Default for ProcedureStageList {
    fn default() -> Self {
        Self(DEFAULT_PROCEDURE.iter().map(|s| s.to_string()).collect())
    }
}

impl ProcedureStageList {
    pub fn new<I, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(stages.into_iter().map(Into::into).collect())
    }

    /// Total stage count `T`
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|s| s == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Stage name → completed, as read from the `flag` mapping of a configuration artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigFlags(BTreeMap<String, bool>);

impl ConfigFlags {
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self(flags.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_completed(&self, stage: &str) -> bool {
        self.0.get(stage).copied().unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Status column of a science row.
///
/// Serialized as a bare string: `"initialized"`, `"completed"`, or the name of
/// the last completed stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObservationStatus {
    Initialized,
    Stage(String),
    Completed,
}

impl From<String> for ObservationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            STATUS_INITIALIZED => ObservationStatus::Initialized,
            STATUS_COMPLETED => ObservationStatus::Completed,
            _ => ObservationStatus::Stage(value),
        }
    }
}

impl From<ObservationStatus> for String {
    fn from(value: ObservationStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationStatus::Initialized => write!(f, "{STATUS_INITIALIZED}"),
            ObservationStatus::Stage(name) => write!(f, "{name}"),
            ObservationStatus::Completed => write!(f, "{STATUS_COMPLETED}"),
        }
    }
}

/// Output of progress derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub status: ObservationStatus,
    pub percent: u8,
}
