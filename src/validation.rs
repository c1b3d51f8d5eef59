//! Name validation for identity segments that end up in filesystem paths.

use crate::error::{MonitorError, Result};

/// Maximum length of a single object, filter or unit name
pub const MAX_NAME_LENGTH: usize = 128;

/// Validate an identity segment (object, filter, unit).
///
/// Segments are joined into paths under the layout roots, so separators and
/// parent references are rejected. A leading `_` or `.` is rejected as well:
/// such folders are staging or hidden and never listed by a scan.
pub fn validate_segment(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MonitorError::InvalidIdentity(format!("{kind} cannot be empty")));
    }

    if value.len() > MAX_NAME_LENGTH {
        return Err(MonitorError::InvalidIdentity(format!(
            "{kind} too long: {} characters (max {MAX_NAME_LENGTH})",
            value.len()
        )));
    }

    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(MonitorError::InvalidIdentity(format!(
            "{kind} '{value}' contains path separators"
        )));
    }

    if value.starts_with('.') || value.starts_with('_') {
        return Err(MonitorError::InvalidIdentity(format!(
            "{kind} '{value}' names a hidden or staging folder"
        )));
    }

    if value.chars().any(char::is_control) {
        return Err(MonitorError::InvalidIdentity(format!(
            "{kind} contains control characters"
        )));
    }

    Ok(())
}

/// Clap value parser for identity segments
pub fn clap_segment_validator(value: &str) -> std::result::Result<String, String> {
    validate_segment("name", value)
        .map(|()| value.to_string())
        .map_err(|e| e.to_string())
}
