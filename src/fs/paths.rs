//! Path resolution for observation artifacts under both layout conventions.
//!
//! Science units keep their configuration as `{object}_{filter}*.<ext>` and
//! every sibling artifact reuses that file's base name. Masterframe units use
//! `{date}_{unit}` as the base name. Comment logs for both live under the
//! separate comments root.

use chrono::NaiveDate;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::models::{LayoutConvention, ObservationIdentity, Target, DATE_FORMAT};

pub const LOG_SUFFIX: &str = ".log";
pub const DEBUG_LOG_SUFFIX: &str = "_debug.log";
pub const COMMENTS_SUFFIX: &str = "_comments.txt";
pub const IMAGES_DIR: &str = "figures";
pub const IMAGE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// Every artifact location for one observation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationPaths {
    pub unit_dir: PathBuf,
    pub config: PathBuf,
    pub log: PathBuf,
    pub debug_log: PathBuf,
    pub comments: PathBuf,
    pub images_dir: PathBuf,
}

impl ObservationPaths {
    fn with_base_name(unit_dir: PathBuf, config: PathBuf, base: &str, comments_root: &Path) -> Self {
        Self {
            log: unit_dir.join(format!("{base}{LOG_SUFFIX}")),
            debug_log: unit_dir.join(format!("{base}{DEBUG_LOG_SUFFIX}")),
            comments: comments_root.join(format!("{base}{COMMENTS_SUFFIX}")),
            images_dir: unit_dir.join(IMAGES_DIR),
            unit_dir,
            config,
        }
    }

    /// Image files under the unit's figures folder, sorted by path.
    ///
    /// A missing folder is the normal state before photometry has run.
    pub fn images(&self) -> Result<Vec<PathBuf>> {
        if !self.images_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut images = Vec::new();
        for entry in fs::read_dir(&self.images_dir)
            .map_err(|e| MonitorError::io(&self.images_dir, e))?
        {
            let path = entry.map_err(|e| MonitorError::io(&self.images_dir, e))?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if is_image && path.is_file() {
                images.push(path);
            }
        }
        images.sort();
        Ok(images)
    }
}

/// Maps identities to artifact paths under the configured roots
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    config: &'a MonitorConfig,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a MonitorConfig) -> Self {
        Self { config }
    }

    /// `<layout root>/<date>`
    pub fn date_dir(&self, layout: LayoutConvention, date: NaiveDate) -> PathBuf {
        self.config
            .layout_root(layout)
            .join(date.format(DATE_FORMAT).to_string())
    }

    /// Folder holding one unit's artifacts
    pub fn unit_dir(&self, identity: &ObservationIdentity) -> PathBuf {
        let date_dir = self.date_dir(identity.layout(), identity.date());
        match identity.target() {
            Target::Science { object, filter } => date_dir.join(object).join(filter),
            Target::Masterframe { unit } => date_dir.join(unit),
        }
    }

    /// Resolve every artifact path for `identity`.
    ///
    /// Fails with `NotFound` when a science unit has no configuration artifact
    /// or a masterframe unit folder does not exist. Never creates files.
    pub fn resolve(&self, identity: &ObservationIdentity) -> Result<ObservationPaths> {
        match identity.target() {
            Target::Science { object, filter } => self.resolve_science(identity, object, filter),
            Target::Masterframe { unit } => self.resolve_masterframe(identity, unit),
        }
    }

    fn resolve_science(
        &self,
        identity: &ObservationIdentity,
        object: &str,
        filter: &str,
    ) -> Result<ObservationPaths> {
        let unit_dir = self.unit_dir(identity);
        let pattern = format!(
            "{}/{}_{}*.{}",
            Pattern::escape(&unit_dir.to_string_lossy()),
            Pattern::escape(object),
            Pattern::escape(filter),
            Pattern::escape(self.config.extension()),
        );

        let config = first_match(&pattern)?.ok_or_else(|| MonitorError::NotFound {
            what: "configuration",
            path: unit_dir.clone(),
        })?;

        let base = config
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| MonitorError::NotFound {
                what: "configuration",
                path: config.clone(),
            })?;

        Ok(ObservationPaths::with_base_name(
            unit_dir,
            config,
            &base,
            &self.config.comments_root,
        ))
    }

    fn resolve_masterframe(&self, identity: &ObservationIdentity, unit: &str) -> Result<ObservationPaths> {
        let unit_dir = self.unit_dir(identity);
        if !unit_dir.is_dir() {
            return Err(MonitorError::NotFound {
                what: "masterframe unit",
                path: unit_dir,
            });
        }

        let base = format!("{}_{unit}", identity.date_str());
        let config = unit_dir.join(format!("{base}.{}", self.config.extension()));

        Ok(ObservationPaths::with_base_name(
            unit_dir,
            config,
            &base,
            &self.config.comments_root,
        ))
    }
}

/// Lexicographically first regular file matching `pattern`
fn first_match(pattern: &str) -> Result<Option<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|e| MonitorError::InvalidIdentity(format!("bad pattern {pattern}: {e}")))?;

    let mut matches: Vec<PathBuf> = paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    Ok(matches.into_iter().next())
}
