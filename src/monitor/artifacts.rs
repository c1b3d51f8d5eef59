//! Reading individual observation artifacts for display.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use super::progress::load_config_document;
use crate::error::{MonitorError, Result};
use crate::fs::ObservationPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ArtifactKind {
    /// Configuration artifact, rendered as JSON
    Config,
    /// Primary pipeline log
    Log,
    /// Debug log
    Debug,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Config => write!(f, "config"),
            ArtifactKind::Log => write!(f, "log"),
            ArtifactKind::Debug => write!(f, "debug"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Artifact {
    Config(serde_json::Value),
    Text(String),
}

pub fn read_artifact(paths: &ObservationPaths, kind: ArtifactKind) -> Result<Artifact> {
    match kind {
        ArtifactKind::Config => {
            let document = load_config_document(&paths.config)?;
            let value = serde_json::to_value(&document)
                .map_err(|e| MonitorError::malformed(&paths.config, e.to_string()))?;
            Ok(Artifact::Config(value))
        }
        ArtifactKind::Log => read_text(&paths.log, "log").map(Artifact::Text),
        ArtifactKind::Debug => read_text(&paths.debug_log, "debug log").map(Artifact::Text),
    }
}

fn read_text(path: &Path, what: &'static str) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(MonitorError::NotFound {
            what,
            path: path.to_path_buf(),
        }),
        Err(e) => Err(MonitorError::io(path, e)),
    }
}
