pub mod comments;
pub mod paths;
pub mod scanner;
pub mod walk;

pub use comments::{append_comment, read_comments, validate_comment};
pub use paths::{ObservationPaths, PathResolver};
pub use scanner::{count_comments, count_warnings_errors, LogCounts};
pub use walk::{latest_mtime, raw_data_exists};
