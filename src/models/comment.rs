//! Comment log entries: one `author|datetime|text` line each.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const FIELD_DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentEntry {
    pub author: String,
    /// ISO 8601 timestamp exactly as written in the log
    pub datetime: String,
    pub text: String,
}

impl CommentEntry {
    pub fn new(author: impl Into<String>, timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            datetime: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            text: text.into(),
        }
    }

    /// Parse one log line, splitting on the first two delimiters only.
    ///
    /// Returns `None` for lines with fewer than two delimiters.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut parts = line.splitn(3, FIELD_DELIMITER);
        let author = parts.next()?;
        let datetime = parts.next()?;
        let text = parts.next()?;
        Some(Self {
            author: author.to_string(),
            datetime: datetime.to_string(),
            text: text.to_string(),
        })
    }

    /// Serialized log line without the trailing newline
    pub fn to_line(&self) -> String {
        format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            self.author, self.datetime, self.text
        )
    }

    /// Timestamp parsed as RFC 3339, if it is one
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.datetime)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
