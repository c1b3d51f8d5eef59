//! Freshness cache behavior through the monitor facade

use obsmon::models::{LayoutConvention, ObservationStatus, Row};
use obsmon::monitor::cache::load_entry;
use obsmon::monitor::CacheKey;
use obsmon::Monitor;
use std::fs::{self, File};
use std::time::{Duration, UNIX_EPOCH};

use super::helpers::{night, set_mtime, PipelineTree, NIGHT};

#[test]
fn test_touching_scanned_tree_forces_rebuild() {
    let tree = PipelineTree::new();
    let dir = tree.science_unit("M31", "g", 1);
    let monitor = Monitor::new(tree.config.clone()).unwrap();

    let first = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    let cached = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    assert!(!first.from_cache);
    assert!(cached.from_cache);

    tree.write(
        &dir.join("M31_g.yml"),
        "flag:\n  configuration: true\n  preprocess: true\n",
        2_000,
    );
    let rebuilt = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    assert!(!rebuilt.from_cache);
    let Row::Science(row) = &rebuilt.rows[0] else {
        panic!("expected science row");
    };
    assert_eq!(row.status, ObservationStatus::Stage("preprocess".to_string()));
}

#[test]
fn test_unrelated_tree_does_not_invalidate() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 1);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    tree.write(
        &tree.config.data_root.join("2025-01-02/M33/r/M33_r.yml"),
        "flag:\n  configuration: true\n",
        9_000,
    );
    tree.masterframe_unit("7DT01", &["bias_a.fits"]);
    set_mtime(
        &tree.config.masterframe_root.join(NIGHT).join("7DT01/bias_a.fits"),
        9_000,
    );

    let again = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    assert!(again.from_cache);
}

#[test]
fn test_cache_shared_between_monitors() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 3);

    let writer = Monitor::new(tree.config.clone()).unwrap();
    let built = writer
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    let reader = Monitor::new(tree.config.clone()).unwrap();
    let served = reader
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    assert!(served.from_cache);
    assert_eq!(built.rows, served.rows);
}

#[test]
fn test_corrupt_cache_file_is_rebuilt() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 3);
    let key = CacheKey::new(night(), LayoutConvention::Science);
    let path = tree.config.cache_dir.join(key.file_name());
    fs::create_dir_all(&tree.config.cache_dir).unwrap();
    fs::write(&path, b"\x00\x01 garbage").unwrap();

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let report = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    assert!(!report.from_cache);
    assert_eq!(report.rows.len(), 1);
    let entry = load_entry(&path).unwrap().unwrap();
    assert_eq!(entry.data, report.rows);
}

#[test]
fn test_no_temporary_files_left_behind() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 3);
    let monitor = Monitor::new(tree.config.clone()).unwrap();
    monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    monitor
        .refresh_status(night(), LayoutConvention::Science, None)
        .unwrap();

    let names: Vec<String> = fs::read_dir(&tree.config.cache_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with(".json"));
}

#[test]
fn test_sub_second_mtime_hits_cache_in_fresh_monitor() {
    let tree = PipelineTree::new();
    let dir = tree.science_unit("M31", "g", 2);
    let mut config = tree.config.clone();
    config.memory_cache = false;

    for nanos in [1, 123_456_789, 999_999_999] {
        let file = File::options()
            .write(true)
            .open(dir.join("M31_g.yml"))
            .unwrap();
        file.set_modified(UNIX_EPOCH + Duration::new(1_736_000_000, nanos))
            .unwrap();

        let built = Monitor::new(config.clone())
            .unwrap()
            .aggregate_status(night(), LayoutConvention::Science, None)
            .unwrap();
        let served = Monitor::new(config.clone())
            .unwrap()
            .aggregate_status(night(), LayoutConvention::Science, None)
            .unwrap();

        assert!(!built.from_cache, "mtime nanos {nanos}");
        assert!(served.from_cache, "mtime nanos {nanos}");
        assert_eq!(built.rows, served.rows);
    }
}

#[test]
fn test_unreadable_unit_is_retried_without_mtime_change() {
    let tree = PipelineTree::new();
    let dir = tree.science_unit("M31", "g", 1);
    let config_path = dir.join("M31_g.yml");
    let original = fs::read(&config_path).unwrap();

    fs::write(&config_path, b"flag:\n  configuration: \xff\xfe\n").unwrap();
    set_mtime(&config_path, 1_000);
    let broken = Monitor::new(tree.config.clone())
        .unwrap()
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    assert!(broken.rows.is_empty());
    assert!(!tree
        .config
        .cache_dir
        .join(CacheKey::new(night(), LayoutConvention::Science).file_name())
        .exists());

    fs::write(&config_path, original).unwrap();
    set_mtime(&config_path, 1_000);
    let recovered = Monitor::new(tree.config.clone())
        .unwrap()
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    assert!(!recovered.from_cache);
    assert_eq!(recovered.rows.len(), 1);
}
