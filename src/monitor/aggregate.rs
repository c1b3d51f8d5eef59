//! Folder aggregation: one status row per observation unit of a night.
//!
//! Science nights are enumerated `<date>/<object>/<filter>`, masterframe
//! nights `<date>/<unit>`, both in sorted name order with `_`/`.` entries
//! skipped. A failing unit is logged and dropped; only an unreadable layout
//! root or date folder fails the whole aggregation.

use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::progress::{derive_progress, read_flags};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::fs::{count_comments, count_warnings_errors, raw_data_exists, PathResolver};
use crate::models::{
    FrameKeys, LayoutConvention, MasterframeRow, ObservationIdentity, Row, StatusRow, Target,
};

const FRAME_PATTERN: &str = r"^(?P<kind>bias|dark|flat)_(?:(?P<key>[^_.]+)[_.])?";

/// Why a scan produced no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Raw frames exist for the night but nothing has been reduced yet
    NotStarted,
    /// No raw frames were found for the night either
    NoData,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyReason::NotStarted => write!(f, "raw data present, pipeline not started"),
            EmptyReason::NoData => write!(f, "no raw data acquired"),
        }
    }
}

/// A unit left out of the result, with the reason it was dropped
#[derive(Debug)]
pub struct DroppedUnit {
    pub unit_dir: PathBuf,
    pub error: MonitorError,
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub rows: Vec<Row>,
    pub dropped: Vec<DroppedUnit>,
    pub empty_reason: Option<EmptyReason>,
}

impl Aggregation {
    /// No unit was lost to a transient failure
    pub fn is_complete(&self) -> bool {
        !self.dropped.iter().any(|dropped| dropped.error.is_transient())
    }
}

/// Calibration masters found in one unit folder
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FrameInventory {
    pub bias: bool,
    pub dark: FrameKeys,
    pub flat: FrameKeys,
}

pub struct FolderAggregator<'a> {
    config: &'a MonitorConfig,
    resolver: PathResolver<'a>,
    frame_pattern: Regex,
}

impl<'a> FolderAggregator<'a> {
    pub fn new(config: &'a MonitorConfig) -> Result<Self> {
        let frame_pattern = Regex::new(FRAME_PATTERN)
            .map_err(|e| MonitorError::Config(format!("invalid frame pattern: {e}")))?;
        Ok(Self {
            config,
            resolver: PathResolver::new(config),
            frame_pattern,
        })
    }

    /// Build every row for `date` under `layout`
    pub fn aggregate(&self, date: NaiveDate, layout: LayoutConvention) -> Result<Aggregation> {
        let root = self.config.layout_root(layout);
        if !root.is_dir() {
            return Err(MonitorError::RootMissing(root.to_path_buf()));
        }

        let date_dir = self.resolver.date_dir(layout, date);
        let mut aggregation = if date_dir.is_dir() {
            match layout {
                LayoutConvention::Science => self.aggregate_science(date, &date_dir)?,
                LayoutConvention::Masterframe => self.aggregate_masterframe(date, &date_dir)?,
            }
        } else {
            Aggregation::default()
        };

        for dropped in &aggregation.dropped {
            warn!(unit = %dropped.unit_dir.display(), error = %dropped.error, "dropping unit from status");
        }

        if aggregation.rows.is_empty() {
            let reason = self.diagnose_empty(date);
            info!(%date, %layout, %reason, "no processed units found");
            aggregation.empty_reason = Some(reason);
        }

        Ok(aggregation)
    }

    /// Probe raw data to tell an unstarted night from an empty one
    pub fn diagnose_empty(&self, date: NaiveDate) -> EmptyReason {
        if raw_data_exists(&self.config.raw_root, date) {
            EmptyReason::NotStarted
        } else {
            EmptyReason::NoData
        }
    }

    fn aggregate_science(&self, date: NaiveDate, date_dir: &Path) -> Result<Aggregation> {
        let mut aggregation = Aggregation::default();
        let mut next_id = 1;

        for (object, object_dir) in list_units(date_dir)? {
            let filters = match list_units(&object_dir) {
                Ok(filters) => filters,
                Err(error) => {
                    aggregation.dropped.push(DroppedUnit {
                        unit_dir: object_dir,
                        error,
                    });
                    continue;
                }
            };

            for (filter, unit_dir) in filters {
                let identity = ObservationIdentity::science_unchecked(date, &object, &filter);
                match self.science_row(&identity) {
                    Ok(mut row) => {
                        row.id = next_id;
                        next_id += 1;
                        aggregation.rows.push(Row::Science(row));
                    }
                    Err(error) => aggregation.dropped.push(DroppedUnit { unit_dir, error }),
                }
            }
        }

        Ok(aggregation)
    }

    fn aggregate_masterframe(&self, date: NaiveDate, date_dir: &Path) -> Result<Aggregation> {
        let mut aggregation = Aggregation::default();

        for (unit, unit_dir) in list_units(date_dir)? {
            let identity = ObservationIdentity::masterframe_unchecked(date, &unit);
            match self.masterframe_row(&identity) {
                Ok(row) => aggregation.rows.push(Row::Masterframe(row)),
                Err(error) => aggregation.dropped.push(DroppedUnit { unit_dir, error }),
            }
        }

        Ok(aggregation)
    }

    /// Row for one science unit; `id` is left at 0 for the caller to assign
    pub fn science_row(&self, identity: &ObservationIdentity) -> Result<StatusRow> {
        let Target::Science { object, filter } = identity.target() else {
            return Err(MonitorError::InvalidIdentity(format!(
                "{identity} is not a science observation"
            )));
        };

        let paths = self.resolver.resolve(identity)?;
        let flags = read_flags(&paths.config, &self.config.stages)?;
        let progress = derive_progress(&flags, &self.config.stages);
        let counts = count_warnings_errors(&paths.log)?;
        let comments = count_comments(&paths.comments)?;

        debug!(%identity, status = %progress.status, progress = progress.percent, "built status row");

        Ok(StatusRow {
            id: 0,
            date: identity.date(),
            masterframe: false,
            object: object.clone(),
            filter: filter.clone(),
            status: progress.status,
            progress: progress.percent,
            warnings: counts.warnings,
            errors: counts.errors,
            comments,
        })
    }

    pub fn masterframe_row(&self, identity: &ObservationIdentity) -> Result<MasterframeRow> {
        let Target::Masterframe { unit } = identity.target() else {
            return Err(MonitorError::InvalidIdentity(format!(
                "{identity} is not a masterframe unit"
            )));
        };

        let paths = self.resolver.resolve(identity)?;
        let inventory = self.classify_frames(&paths.unit_dir)?;
        let counts = count_warnings_errors(&paths.log)?;
        let comments = count_comments(&paths.comments)?;

        Ok(MasterframeRow {
            date: identity.date(),
            masterframe: true,
            unit: unit.clone(),
            bias: inventory.bias,
            dark: inventory.dark,
            flat: inventory.flat,
            warnings: counts.warnings,
            errors: counts.errors,
            comments,
        })
    }

    /// Classify master files by name: `bias_*`, `dark_<key>[_.]*`, `flat_<key>[_.]*`
    pub fn classify_frames(&self, unit_dir: &Path) -> Result<FrameInventory> {
        let mut inventory = FrameInventory::default();

        for entry in fs::read_dir(unit_dir).map_err(|e| MonitorError::io(unit_dir, e))? {
            let entry = entry.map_err(|e| MonitorError::io(unit_dir, e))?;
            if !entry.path().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(caps) = self.frame_pattern.captures(&name) else {
                continue;
            };
            let key = caps.name("key").map(|m| m.as_str());

            match (&caps["kind"], key) {
                ("bias", _) => inventory.bias = true,
                ("dark", Some(key)) => inventory.dark.insert(key),
                ("flat", Some(key)) => inventory.flat.insert(key),
                _ => {}
            }
        }

        Ok(inventory)
    }
}

/// Sub-directories of `dir` in name order, skipping staging and hidden folders
fn list_units(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut units = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| MonitorError::io(dir, e))? {
        let entry = entry.map_err(|e| MonitorError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('_') || name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            units.push((name, path));
        }
    }
    units.sort();
    Ok(units)
}
