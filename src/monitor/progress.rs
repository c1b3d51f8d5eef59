//! Stage and percent-progress derivation from configuration flags.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::models::{ConfigFlags, ObservationStatus, ProcedureStageList, Progress};

/// Key of the stage-completion mapping inside a configuration artifact
pub const FLAG_KEY: &str = "flag";

/// Parse a configuration artifact into a YAML document
pub fn load_config_document(path: &Path) -> Result<serde_yaml::Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MonitorError::NotFound {
                what: "configuration",
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(MonitorError::io(path, e)),
    };

    serde_yaml::from_str(&content).map_err(|e| MonitorError::malformed(path, e.to_string()))
}

/// Read the `flag` mapping of a configuration artifact.
///
/// Fails with `MalformedConfig` when the mapping is missing, holds non-boolean
/// values, or names a stage outside `stages`.
pub fn read_flags(path: &Path, stages: &ProcedureStageList) -> Result<ConfigFlags> {
    let document = load_config_document(path)?;

    let flag = document
        .get(FLAG_KEY)
        .ok_or_else(|| MonitorError::malformed(path, "missing 'flag' mapping"))?;
    if !flag.is_mapping() {
        return Err(MonitorError::malformed(path, "'flag' is not a mapping"));
    }

    let flags: ConfigFlags = serde_yaml::from_value(flag.clone())
        .map_err(|e| MonitorError::malformed(path, format!("invalid 'flag' mapping: {e}")))?;

    if let Some(unknown) = flags.names().find(|name| !stages.contains(name)) {
        return Err(MonitorError::malformed(
            path,
            format!("unknown stage '{unknown}' in 'flag' mapping"),
        ));
    }

    Ok(flags)
}

/// Derive `(status, percent)` from completion flags.
///
/// Status names the last completed stage, not the next pending one:
/// `initialized` when nothing is done, `completed` when every stage is.
pub fn derive_progress(flags: &ConfigFlags, stages: &ProcedureStageList) -> Progress {
    let total = stages.len();
    let completed = stages.iter().filter(|s| flags.is_completed(s)).count();

    if has_gap(flags, stages) {
        debug!(completed, total, "completion flags are not a prefix of the procedure");
    }

    let status = if total > 0 && completed == total {
        ObservationStatus::Completed
    } else if completed == 0 {
        ObservationStatus::Initialized
    } else {
        stages
            .get(completed - 1)
            .map(|name| ObservationStatus::Stage(name.to_string()))
            .unwrap_or(ObservationStatus::Initialized)
    };

    Progress {
        status,
        percent: percent(completed, total),
    }
}

/// `round(completed / total * 100)`, ties to even
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let value = (completed as f64 / total as f64 * 100.0).round_ties_even();
    value.clamp(0.0, 100.0) as u8
}

/// A completed stage after an incomplete one
fn has_gap(flags: &ConfigFlags, stages: &ProcedureStageList) -> bool {
    let mut pending_seen = false;
    for stage in stages.iter() {
        let done = flags.is_completed(stage);
        if done && pending_seen {
            return true;
        }
        pending_seen |= !done;
    }
    false
}
