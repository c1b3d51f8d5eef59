//! Monitor configuration: layout roots, procedure stages, scan bounds.
//!
//! Loaded from TOML. Every component receives the configuration at
//! construction; nothing reads roots from process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::models::{LayoutConvention, ProcedureStageList};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV_VAR: &str = "OBSMON_CONFIG";

pub const DEFAULT_CONFIG_EXTENSION: &str = "yml";
pub const DEFAULT_MAX_WALK_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Root of the science output tree (`<date>/<object>/<filter>`)
    pub data_root: PathBuf,
    /// Root of the masterframe output tree (`<date>/<unit>`)
    pub masterframe_root: PathBuf,
    /// Comment logs for both layouts
    pub comments_root: PathBuf,
    /// Raw (un-reduced) data, probed only for empty-scan diagnostics
    pub raw_root: PathBuf,
    /// Persisted cache entries
    pub cache_dir: PathBuf,
    /// Extension of observation configuration artifacts, without the dot
    pub config_extension: String,
    /// Depth bound for fingerprint walks
    pub max_walk_depth: usize,
    /// Keep an in-process tier in front of the persisted cache
    pub memory_cache: bool,
    pub stages: ProcedureStageList,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("/data/pipeline_reform/processed"),
            masterframe_root: PathBuf::from("/data/pipeline_reform/master_frame"),
            comments_root: PathBuf::from("/tmp/pipeline/comments"),
            raw_root: PathBuf::from("/lyman/data1/obsdata"),
            cache_dir: PathBuf::from("/tmp/pipeline/cache"),
            config_extension: DEFAULT_CONFIG_EXTENSION.to_string(),
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
            memory_cache: true,
            stages: ProcedureStageList::default(),
        }
    }
}

impl MonitorConfig {
    /// Defaults with every root placed under `base`
    pub fn rooted(base: &Path) -> Self {
        Self {
            data_root: base.join("processed"),
            masterframe_root: base.join("master_frame"),
            comments_root: base.join("comments"),
            raw_root: base.join("obsdata"),
            cache_dir: base.join("cache"),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MonitorConfig = toml::from_str(content)
            .map_err(|e| MonitorError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the lookup order: explicit path, then
    /// `OBSMON_CONFIG`, then the per-user default location.
    ///
    /// An explicitly named file must exist. A missing default file yields
    /// the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return load_config_required(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return load_config_required(Path::new(&path));
        }

        match default_config_path() {
            Some(path) => Ok(load_config(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(MonitorError::Config("stage list cannot be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for stage in self.stages.iter() {
            if stage.trim().is_empty() {
                return Err(MonitorError::Config("stage names cannot be blank".to_string()));
            }
            if !seen.insert(stage) {
                return Err(MonitorError::Config(format!("duplicate stage '{stage}'")));
            }
        }

        if self.max_walk_depth == 0 {
            return Err(MonitorError::Config(
                "max_walk_depth must be at least 1".to_string(),
            ));
        }

        if self.config_extension.trim_start_matches('.').is_empty() {
            return Err(MonitorError::Config(
                "config_extension cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn layout_root(&self, layout: LayoutConvention) -> &Path {
        match layout {
            LayoutConvention::Science => &self.data_root,
            LayoutConvention::Masterframe => &self.masterframe_root,
        }
    }

    /// Configuration extension without a leading dot
    pub fn extension(&self) -> &str {
        self.config_extension.trim_start_matches('.')
    }
}

/// `<config dir>/obsmon/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("obsmon").join("config.toml"))
}

/// Load and parse a config file
///
/// # Returns
/// * `Ok(Some(config))` - Parsed and validated
/// * `Ok(None)` - File doesn't exist
/// * `Err(_)` - Failed to read, parse or validate
pub fn load_config(path: &Path) -> Result<Option<MonitorConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| MonitorError::io(path, e))?;
    MonitorConfig::from_toml_str(&content).map(Some)
}

/// Load a config file, returning an error if it doesn't exist
pub fn load_config_required(path: &Path) -> Result<MonitorConfig> {
    load_config(path)?.ok_or_else(|| {
        MonitorError::Config(format!("config file not found: {}", path.display()))
    })
}
