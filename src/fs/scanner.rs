//! Line counters for pipeline logs and comment logs.
//!
//! A missing file is the normal state for an observation that has not run
//! yet, so it counts as zero rather than an error.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{MonitorError, Result};
use crate::models::comment::FIELD_DELIMITER;

pub const WARNING_MARKER: &str = "[WARNING]";
pub const ERROR_MARKER: &str = "[ERROR]";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogCounts {
    pub warnings: usize,
    pub errors: usize,
}

/// Count `[WARNING]` and `[ERROR]` lines in a log.
///
/// Each line counts once: a line carrying both markers is a warning.
pub fn count_warnings_errors(path: &Path) -> Result<LogCounts> {
    let mut counts = LogCounts::default();
    for_each_line(path, |line| {
        if line.contains(WARNING_MARKER) {
            counts.warnings += 1;
        } else if line.contains(ERROR_MARKER) {
            counts.errors += 1;
        }
    })?;
    Ok(counts)
}

/// Count comment lines: any line containing the field delimiter.
///
/// Looser than [`crate::fs::comments::read_comments`], which also requires
/// a timestamp field.
pub fn count_comments(path: &Path) -> Result<usize> {
    let mut count = 0;
    for_each_line(path, |line| {
        if line.contains(FIELD_DELIMITER) {
            count += 1;
        }
    })?;
    Ok(count)
}

/// Feed each line to `visit`, decoding invalid UTF-8 lossily.
/// A missing file visits nothing.
fn for_each_line(path: &Path, mut visit: impl FnMut(&str)) -> Result<()> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(MonitorError::io(path, e)),
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| MonitorError::io(path, e))?;
        if read == 0 {
            break;
        }
        visit(&String::from_utf8_lossy(&buf));
    }
    Ok(())
}
