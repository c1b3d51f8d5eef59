//! Error taxonomy for the status-aggregation engine.
//!
//! Most variants are contained at the level of a single observation row: the
//! aggregator logs them and drops the unit. Only [`MonitorError::RootMissing`]
//! and I/O failures on the layout root abort a whole request.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// An expected artifact (configuration, log, unit folder) does not exist
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// Configuration artifact exists but lacks a usable `flag` mapping
    #[error("malformed configuration {}: {reason}", path.display())]
    MalformedConfig { path: PathBuf, reason: String },

    /// Permission problems, vanished files, stalled mounts
    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Persisted cache entry could not be read back
    #[error("corrupt cache entry {}: {reason}", path.display())]
    CacheCorruption { path: PathBuf, reason: String },

    /// The layout root itself is missing, so no scan can run
    #[error("layout root does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid comment: {0}")]
    InvalidComment(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl MonitorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MonitorError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MonitorError::MalformedConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for the "expected absence" class that renders as empty/zero
    pub fn is_not_found(&self) -> bool {
        matches!(self, MonitorError::NotFound { .. })
    }

    /// Failures that can clear without any file's mtime changing
    pub fn is_transient(&self) -> bool {
        matches!(self, MonitorError::Io { .. })
    }
}
