//! Comment recording and its effect on status rows

use chrono::{TimeZone, Utc};
use obsmon::models::{LayoutConvention, ObservationIdentity};
use obsmon::Monitor;
use std::fs;

use super::helpers::{night, PipelineTree};

#[test]
fn test_comment_round_trip_keeps_delimiters_in_text() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 2);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let identity = ObservationIdentity::science(night(), "M31", "g").unwrap();
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    monitor
        .record_comment(&identity, "a", ts, "hello|world")
        .unwrap();

    let entries = monitor.comments(&identity).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].author, "a");
    assert_eq!(entries[0].datetime, "2025-01-01T00:00:00Z");
    assert_eq!(entries[0].text, "hello|world");

    let log = fs::read_to_string(tree.config.comments_root.join("M31_g_comments.txt")).unwrap();
    assert_eq!(log, "a|2025-01-01T00:00:00Z|hello|world\n");
}

#[test]
fn test_new_comment_invalidates_cached_counts() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 2);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let identity = ObservationIdentity::science(night(), "M31", "g").unwrap();

    let before = monitor
        .aggregate_status(night(), LayoutConvention::Science, Some(&identity))
        .unwrap();
    assert_eq!(before.rows[0].comments(), 0);

    monitor
        .record_comment(&identity, "observer", Utc::now(), "clouds after 2am")
        .unwrap();

    let after = monitor
        .aggregate_status(night(), LayoutConvention::Science, Some(&identity))
        .unwrap();
    assert!(!after.from_cache);
    assert_eq!(after.rows[0].comments(), 1);
}

#[test]
fn test_masterframe_comment_log_location() {
    let tree = PipelineTree::new();
    tree.masterframe_unit("7DT01", &["bias_a.fits"]);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let identity = ObservationIdentity::masterframe(night(), "7DT01").unwrap();

    monitor
        .record_comment(&identity, "a", Utc::now(), "flat looks odd")
        .unwrap();

    assert!(tree
        .config
        .comments_root
        .join("2025-01-01_7DT01_comments.txt")
        .is_file());
}

#[test]
fn test_invalid_comment_rejected_without_write() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 2);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let identity = ObservationIdentity::science(night(), "M31", "g").unwrap();

    assert!(monitor
        .record_comment(&identity, "a|b", Utc::now(), "text")
        .is_err());
    assert!(monitor
        .record_comment(&identity, "a", Utc::now(), "two\nlines")
        .is_err());
    assert!(monitor.comments(&identity).unwrap().is_empty());
}
