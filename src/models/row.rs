//! Dashboard rows assembled by the aggregator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::stage::ObservationStatus;

/// Status of one science observation (`date/object/filter`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRow {
    /// 1-based position in enumeration order
    pub id: usize,
    pub date: NaiveDate,
    pub masterframe: bool,
    pub object: String,
    pub filter: String,
    pub status: ObservationStatus,
    /// Percent of procedure stages completed, 0–100
    pub progress: u8,
    pub warnings: usize,
    pub errors: usize,
    pub comments: usize,
}

/// Calibration products present for one unit on one night
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterframeRow {
    pub date: NaiveDate,
    pub masterframe: bool,
    pub unit: String,
    pub bias: bool,
    pub dark: FrameKeys,
    pub flat: FrameKeys,
    pub warnings: usize,
    pub errors: usize,
    pub comments: usize,
}

/// Distinct exposure-time or filter keys of dark/flat masters.
///
/// Serialized as a sorted list, or as `false` when no master of that kind exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FrameKeysRepr", into = "FrameKeysRepr")]
pub struct FrameKeys(BTreeSet<String>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FrameKeysRepr {
    Present(BTreeSet<String>),
    Absent(bool),
}

impl From<FrameKeysRepr> for FrameKeys {
    fn from(repr: FrameKeysRepr) -> Self {
        match repr {
            FrameKeysRepr::Present(keys) => FrameKeys(keys),
            FrameKeysRepr::Absent(_) => FrameKeys::default(),
        }
    }
}

impl From<FrameKeys> for FrameKeysRepr {
    fn from(keys: FrameKeys) -> Self {
        if keys.0.is_empty() {
            FrameKeysRepr::Absent(false)
        } else {
            FrameKeysRepr::Present(keys.0)
        }
    }
}

impl FrameKeys {
    pub fn insert(&mut self, key: impl Into<String>) {
        self.0.insert(key.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FrameKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FrameKeys(iter.into_iter().map(Into::into).collect())
    }
}

/// A row of either layout family, as stored in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Row {
    Science(StatusRow),
    Masterframe(MasterframeRow),
}

impl Row {
    pub fn warnings(&self) -> usize {
        match self {
            Row::Science(r) => r.warnings,
            Row::Masterframe(r) => r.warnings,
        }
    }

    pub fn errors(&self) -> usize {
        match self {
            Row::Science(r) => r.errors,
            Row::Masterframe(r) => r.errors,
        }
    }

    pub fn comments(&self) -> usize {
        match self {
            Row::Science(r) => r.comments,
            Row::Masterframe(r) => r.comments,
        }
    }
}
