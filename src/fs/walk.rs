//! Modification-time fingerprints and raw-data probing.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

use crate::models::DATE_FORMAT;

/// Latest file modification time under `root`, in nanoseconds since the epoch.
///
/// Walks at most `max_depth` levels. Directories themselves don't count, and
/// entries that vanish or can't be stat'ed mid-walk are skipped. A missing
/// root yields `0`.
pub fn latest_mtime(root: &Path, max_depth: usize) -> u64 {
    WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok()?.modified().ok())
        .map(epoch_nanos)
        .max()
        .unwrap_or(0)
}

fn epoch_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn is_hidden_or_staging(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Whether raw frames for `date` exist under `raw_root`.
///
/// Raw data is laid out `<raw_root>/<instrument>/<night folder>`, where the
/// night folder's name contains the date. Used only to tell "pipeline not yet
/// started" apart from "nothing observed".
pub fn raw_data_exists(raw_root: &Path, date: NaiveDate) -> bool {
    let needle = date.format(DATE_FORMAT).to_string();

    let Ok(instruments) = fs::read_dir(raw_root) else {
        return false;
    };

    instruments
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| !is_hidden_or_staging(&entry.file_name().to_string_lossy()))
        .any(|instrument| {
            fs::read_dir(instrument.path())
                .map(|nights| {
                    nights
                        .filter_map(|entry| entry.ok())
                        .any(|night| night.file_name().to_string_lossy().contains(&needle))
                })
                .unwrap_or(false)
        })
}
