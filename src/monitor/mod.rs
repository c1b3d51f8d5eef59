//! The status-aggregation engine and its public surface.
//!
//! [`Monitor`] owns the configuration and the freshness cache, and ties the
//! path resolver, progress deriver, log scanner and folder aggregator into the
//! operations a dashboard calls.

pub mod aggregate;
pub mod artifacts;
pub mod cache;
pub mod progress;

use chrono::{DateTime, NaiveDate, Utc};
use std::path::PathBuf;
use tracing::info;

pub use aggregate::{Aggregation, DroppedUnit, EmptyReason, FolderAggregator, FrameInventory};
pub use artifacts::{Artifact, ArtifactKind};
pub use cache::{CacheEntry, CacheKey, Fingerprint, FreshnessCache, Lookup, Rebuild};
pub use progress::{derive_progress, percent, read_flags};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::fs::{append_comment, read_comments, ObservationPaths, PathResolver};
use crate::models::{CommentEntry, LayoutConvention, ObservationIdentity, Row, Target};

/// Result of one status request
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub rows: Vec<Row>,
    pub from_cache: bool,
    /// Set when the night has no rows at all
    pub empty_reason: Option<EmptyReason>,
}

pub struct Monitor {
    config: MonitorConfig,
    cache: FreshnessCache,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        let cache = FreshnessCache::new(&config);
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.config)
    }

    /// Rows for every unit of `date`, or only those matching `identity`.
    ///
    /// Identity-scoped requests filter the date-wide rows, so a unit keeps the
    /// id it has in the full listing.
    pub fn aggregate_status(
        &self,
        date: NaiveDate,
        layout: LayoutConvention,
        identity: Option<&ObservationIdentity>,
    ) -> Result<StatusReport> {
        self.status(date, layout, identity, false)
    }

    /// Like [`Monitor::aggregate_status`] but ignores any cached entry
    pub fn refresh_status(
        &self,
        date: NaiveDate,
        layout: LayoutConvention,
        identity: Option<&ObservationIdentity>,
    ) -> Result<StatusReport> {
        self.status(date, layout, identity, true)
    }

    fn status(
        &self,
        date: NaiveDate,
        layout: LayoutConvention,
        identity: Option<&ObservationIdentity>,
        refresh: bool,
    ) -> Result<StatusReport> {
        if let Some(identity) = identity {
            if identity.date() != date || identity.layout() != layout {
                return Err(MonitorError::InvalidIdentity(format!(
                    "{identity} does not belong to {layout} night {date}"
                )));
            }
        }

        let root = self.config.layout_root(layout);
        if !root.is_dir() {
            return Err(MonitorError::RootMissing(root.to_path_buf()));
        }

        let aggregator = FolderAggregator::new(&self.config)?;
        let scan_root = self.resolver().date_dir(layout, date);
        let key = CacheKey::new(date, layout);

        let mut empty_reason = None;
        let lookup = self.cache.get_or_build(
            &key,
            &scan_root,
            &self.config.comments_root,
            refresh,
            || {
                let aggregation = aggregator.aggregate(date, layout)?;
                empty_reason = aggregation.empty_reason;
                Ok(if aggregation.is_complete() {
                    Rebuild::complete(aggregation.rows)
                } else {
                    Rebuild::partial(aggregation.rows)
                })
            },
        )?;

        if lookup.rows.is_empty() && empty_reason.is_none() {
            empty_reason = Some(aggregator.diagnose_empty(date));
        }

        let rows = match identity {
            Some(identity) => lookup
                .rows
                .into_iter()
                .filter(|row| row_matches(row, identity))
                .collect(),
            None => lookup.rows,
        };

        Ok(StatusReport {
            rows,
            from_cache: lookup.from_cache,
            empty_reason,
        })
    }

    /// Every artifact path for one unit; `NotFound` when it does not exist
    pub fn resolve_paths(&self, identity: &ObservationIdentity) -> Result<ObservationPaths> {
        self.resolver().resolve(identity)
    }

    /// Append a comment to the unit's comment log
    pub fn record_comment(
        &self,
        identity: &ObservationIdentity,
        author: &str,
        timestamp: DateTime<Utc>,
        text: &str,
    ) -> Result<CommentEntry> {
        let paths = self.resolve_paths(identity)?;
        let entry = CommentEntry::new(author, timestamp, text);
        append_comment(&paths.comments, &entry)?;
        info!(%identity, author, "recorded comment");
        Ok(entry)
    }

    pub fn comments(&self, identity: &ObservationIdentity) -> Result<Vec<CommentEntry>> {
        let paths = self.resolve_paths(identity)?;
        read_comments(&paths.comments)
    }

    pub fn images(&self, identity: &ObservationIdentity) -> Result<Vec<PathBuf>> {
        self.resolve_paths(identity)?.images()
    }

    pub fn read_artifact(&self, identity: &ObservationIdentity, kind: ArtifactKind) -> Result<Artifact> {
        let paths = self.resolve_paths(identity)?;
        artifacts::read_artifact(&paths, kind)
    }
}

fn row_matches(row: &Row, identity: &ObservationIdentity) -> bool {
    match (row, identity.target()) {
        (Row::Science(row), Target::Science { object, filter }) => {
            &row.object == object && &row.filter == filter
        }
        (Row::Masterframe(row), Target::Masterframe { unit }) => &row.unit == unit,
        _ => false,
    }
}
