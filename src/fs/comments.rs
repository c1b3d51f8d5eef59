//! Append-only comment logs.

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::error::{MonitorError, Result};
use crate::models::comment::{CommentEntry, FIELD_DELIMITER};

/// Maximum characters in a comment body
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Validate a comment before it is written.
///
/// The author field cannot hold the delimiter; neither field may span lines.
pub fn validate_comment(author: &str, text: &str) -> Result<()> {
    if author.trim().is_empty() {
        return Err(MonitorError::InvalidComment("author cannot be empty".to_string()));
    }
    if author.contains(FIELD_DELIMITER) {
        return Err(MonitorError::InvalidComment(format!(
            "author cannot contain '{FIELD_DELIMITER}'"
        )));
    }
    if text.trim().is_empty() {
        return Err(MonitorError::InvalidComment("comment cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_COMMENT_LENGTH {
        return Err(MonitorError::InvalidComment(format!(
            "comment too long: {} characters (max {MAX_COMMENT_LENGTH})",
            text.chars().count()
        )));
    }
    if [author, text]
        .iter()
        .any(|field| field.contains('\n') || field.contains('\r'))
    {
        return Err(MonitorError::InvalidComment(
            "comments must fit on a single line".to_string(),
        ));
    }
    Ok(())
}

/// Append one entry, creating the log and its parent directory if needed.
///
/// Holds an exclusive lock for the write so concurrent appenders never
/// interleave partial lines.
pub fn append_comment(path: &Path, entry: &CommentEntry) -> Result<()> {
    validate_comment(&entry.author, &entry.text)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MonitorError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| MonitorError::io(path, e))?;

    FileExt::lock_exclusive(&file).map_err(|e| MonitorError::io(path, e))?;
    let written = writeln!(file, "{}", entry.to_line());
    let unlocked = FileExt::unlock(&file);
    written.map_err(|e| MonitorError::io(path, e))?;
    unlocked.map_err(|e| MonitorError::io(path, e))?;

    Ok(())
}

/// Read all well-formed entries in append order. A missing log is empty.
pub fn read_comments(path: &Path) -> Result<Vec<CommentEntry>> {
    let content = match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(MonitorError::io(path, e)),
    };

    Ok(content.lines().filter_map(CommentEntry::parse_line).collect())
}
