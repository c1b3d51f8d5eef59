//! Freshness cache for aggregated rows.
//!
//! An entry is valid while two fingerprints match: the latest file mtime under
//! the scanned date folder and the latest mtime under the comments root, both
//! in integer nanoseconds. Entries persist as one JSON document per key so
//! separate processes share them; an optional in-memory tier sits in front
//! with the same rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::fs::latest_mtime;
use crate::models::{LayoutConvention, Row, DATE_FORMAT};

/// One night under one layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub date: NaiveDate,
    pub layout: LayoutConvention,
}

impl CacheKey {
    pub fn new(date: NaiveDate, layout: LayoutConvention) -> Self {
        Self { date, layout }
    }

    /// `<date>_<layout>.json`
    pub fn file_name(&self) -> String {
        format!("{}_{}.json", self.date.format(DATE_FORMAT), self.layout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub scan: u64,
    pub comments: u64,
}

impl Fingerprint {
    pub fn capture(scan_root: &Path, comments_root: &Path, max_depth: usize) -> Self {
        Self {
            scan: latest_mtime(scan_root, max_depth),
            comments: latest_mtime(comments_root, max_depth),
        }
    }
}

/// Persisted form: `{mtime, comments_mtime, data}`, mtimes in epoch nanoseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub mtime: u64,
    pub comments_mtime: u64,
    pub data: Vec<Row>,
}

impl CacheEntry {
    pub fn new(fingerprint: Fingerprint, data: Vec<Row>) -> Self {
        Self {
            mtime: fingerprint.scan,
            comments_mtime: fingerprint.comments,
            data,
        }
    }

    pub fn is_fresh(&self, fingerprint: Fingerprint) -> bool {
        self.mtime == fingerprint.scan && self.comments_mtime == fingerprint.comments
    }
}

/// Rows produced by a rebuild.
///
/// A rebuild that lost units to transient I/O failures is not cacheable: the
/// failure can clear without any mtime changing, so the next poll must scan again.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebuild {
    pub rows: Vec<Row>,
    pub cacheable: bool,
}

impl Rebuild {
    pub fn complete(rows: Vec<Row>) -> Self {
        Self {
            rows,
            cacheable: true,
        }
    }

    pub fn partial(rows: Vec<Row>) -> Self {
        Self {
            rows,
            cacheable: false,
        }
    }
}

/// Rows handed back by [`FreshnessCache::get_or_build`]
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub rows: Vec<Row>,
    pub from_cache: bool,
}

pub struct FreshnessCache {
    cache_dir: PathBuf,
    max_depth: usize,
    memory: Option<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl FreshnessCache {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            max_depth: config.max_walk_depth,
            memory: config.memory_cache.then(|| Mutex::new(HashMap::new())),
        }
    }

    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Return cached rows for `key` if both fingerprints still match,
    /// otherwise run `build`, store its rows if cacheable and return them.
    ///
    /// With `refresh` set the lookup is skipped but the result is still stored.
    /// Cache failures never reach the caller; only `build` errors do.
    pub fn get_or_build<F>(
        &self,
        key: &CacheKey,
        scan_root: &Path,
        comments_root: &Path,
        refresh: bool,
        build: F,
    ) -> Result<Lookup>
    where
        F: FnOnce() -> Result<Rebuild>,
    {
        let fingerprint = Fingerprint::capture(scan_root, comments_root, self.max_depth);

        if !refresh {
            if let Some(rows) = self.lookup(key, fingerprint) {
                return Ok(Lookup {
                    rows,
                    from_cache: true,
                });
            }
        }

        debug!(date = %key.date, layout = %key.layout, refresh, "cache miss, rebuilding");
        let Rebuild { rows, cacheable } = build()?;

        if cacheable {
            let entry = CacheEntry::new(fingerprint, rows.clone());
            if let Err(e) = self.persist(key, &entry) {
                warn!(error = %e, "failed to persist cache entry");
            }
            if let Some(mut memory) = self.memory_tier() {
                memory.insert(*key, entry);
            }
        } else {
            debug!(date = %key.date, layout = %key.layout, "rebuild incomplete, not caching");
            self.evict(key);
        }

        Ok(Lookup {
            rows,
            from_cache: false,
        })
    }

    /// Drop `key` from both tiers so a stale complete entry cannot be served
    fn evict(&self, key: &CacheKey) {
        if let Some(mut memory) = self.memory_tier() {
            memory.remove(key);
        }
        let path = self.entry_path(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "failed to evict cache entry");
            }
        }
    }

    fn lookup(&self, key: &CacheKey, fingerprint: Fingerprint) -> Option<Vec<Row>> {
        if let Some(memory) = self.memory_tier() {
            if let Some(entry) = memory.get(key).filter(|entry| entry.is_fresh(fingerprint)) {
                debug!(date = %key.date, layout = %key.layout, "memory cache hit");
                return Some(entry.data.clone());
            }
        }

        let path = self.entry_path(key);
        let entry = match load_entry(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        if !entry.is_fresh(fingerprint) {
            debug!(path = %path.display(), "cache entry is stale");
            return None;
        }

        debug!(path = %path.display(), "disk cache hit");
        let rows = entry.data.clone();
        if let Some(mut memory) = self.memory_tier() {
            memory.insert(*key, entry);
        }
        Some(rows)
    }

    /// Write to a uniquely named sibling, then rename into place
    fn persist(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).map_err(|e| MonitorError::io(&self.cache_dir, e))?;

        let path = self.entry_path(key);
        let tmp = self
            .cache_dir
            .join(format!(".{}.{}.tmp", key.file_name(), uuid::Uuid::new_v4()));

        let json = serde_json::to_vec(entry).map_err(|e| MonitorError::io(&path, e.into()))?;
        fs::write(&tmp, json).map_err(|e| MonitorError::io(&tmp, e))?;

        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(MonitorError::io(&path, e));
        }
        Ok(())
    }

    fn memory_tier(&self) -> Option<MutexGuard<'_, HashMap<CacheKey, CacheEntry>>> {
        self.memory
            .as_ref()
            .map(|memory| memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

/// Read a persisted entry; a missing file is `Ok(None)`
pub fn load_entry(path: &Path) -> Result<Option<CacheEntry>> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(MonitorError::io(path, e)),
    };

    serde_json::from_slice(&content)
        .map(Some)
        .map_err(|e| MonitorError::CacheCorruption {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}
