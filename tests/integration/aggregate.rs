//! Status aggregation over realistic output trees

use obsmon::models::{LayoutConvention, ObservationIdentity, ObservationStatus, Row};
use obsmon::monitor::EmptyReason;
use obsmon::{Monitor, MonitorError};
use std::fs;

use super::helpers::{night, PipelineTree, NIGHT};

fn science_rows(rows: &[Row]) -> Vec<&obsmon::models::StatusRow> {
    rows.iter()
        .map(|row| match row {
            Row::Science(row) => row,
            Row::Masterframe(_) => panic!("unexpected masterframe row"),
        })
        .collect()
}

#[test]
fn test_night_overview_matches_tree() {
    let tree = PipelineTree::new();
    let m31 = tree.science_unit("M31", "g", 7);
    tree.science_unit("M31", "r", 3);
    tree.science_unit("NGC253", "i", 0);
    tree.write(
        &m31.join("M31_g.log"),
        "[INFO] start\n[WARNING] low snr\n[WARNING] few stars\n[ERROR] crash\n",
        1_000,
    );

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let report = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    let rows = science_rows(&report.rows);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].status, ObservationStatus::Completed);
    assert_eq!(rows[0].progress, 100);
    assert_eq!((rows[0].warnings, rows[0].errors), (2, 1));

    assert_eq!(rows[1].status, ObservationStatus::Stage("astrometry".to_string()));
    assert_eq!(rows[1].progress, 43);
    assert_eq!((rows[1].warnings, rows[1].errors), (0, 0));

    assert_eq!(rows[2].object, "NGC253");
    assert_eq!(rows[2].status, ObservationStatus::Initialized);
    assert_eq!(rows[2].progress, 0);
}

#[test]
fn test_aggregation_is_idempotent() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 2);
    tree.science_unit("M31", "r", 5);
    tree.science_unit("M101", "u", 1);

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let first = monitor
        .refresh_status(night(), LayoutConvention::Science, None)
        .unwrap();
    let second = monitor
        .refresh_status(night(), LayoutConvention::Science, None)
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first.rows).unwrap(),
        serde_json::to_string(&second.rows).unwrap()
    );
}

#[test]
fn test_broken_unit_does_not_hide_the_rest() {
    let tree = PipelineTree::new();
    tree.science_unit("M31", "g", 4);
    let broken = tree.config.data_root.join(NIGHT).join("M31/r");
    tree.write(&broken.join("M31_r.yml"), "flag: [unclosed\n", 1_000);

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let report = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();

    let rows = science_rows(&report.rows);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].filter, "g");
}

#[test]
fn test_ambiguous_configuration_resolves_to_first_match() {
    let tree = PipelineTree::new();
    let dir = tree.science_unit("M31", "g", 1);
    tree.write(&dir.join("M31_g_v2.yml"), "flag:\n  configuration: true\n  preprocess: true\n", 1_000);

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let identity = ObservationIdentity::science(night(), "M31", "g").unwrap();
    for _ in 0..3 {
        let paths = monitor.resolve_paths(&identity).unwrap();
        assert_eq!(paths.config, dir.join("M31_g.yml"));
        assert_eq!(paths.log, dir.join("M31_g.log"));
    }
}

#[test]
fn test_masterframe_classification() {
    let tree = PipelineTree::new();
    tree.masterframe_unit(
        "7DT01",
        &["bias_abc.fits", "dark_100s_x.fits", "flat_g_y.fits", "notes.txt"],
    );
    tree.masterframe_unit("7DT03", &[]);

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let report = monitor
        .aggregate_status(night(), LayoutConvention::Masterframe, None)
        .unwrap();

    assert_eq!(report.rows.len(), 2);
    let Row::Masterframe(first) = &report.rows[0] else {
        panic!("expected masterframe row");
    };
    assert_eq!(first.unit, "7DT01");
    assert!(first.bias);
    assert_eq!(first.dark.iter().collect::<Vec<_>>(), vec!["100s"]);
    assert_eq!(first.flat.iter().collect::<Vec<_>>(), vec!["g"]);

    let json = serde_json::to_value(&report.rows[1]).unwrap();
    assert_eq!(json["unit"], "7DT03");
    assert_eq!(json["bias"], false);
    assert_eq!(json["dark"], false);
    assert_eq!(json["flat"], false);
}

#[test]
fn test_empty_night_reports_reason() {
    let tree = PipelineTree::new();
    let monitor = Monitor::new(tree.config.clone()).unwrap();

    let report = monitor
        .aggregate_status(night(), LayoutConvention::Science, None)
        .unwrap();
    assert!(report.rows.is_empty());
    assert_eq!(report.empty_reason, Some(EmptyReason::NoData));

    fs::create_dir_all(tree.config.raw_root.join("7DT02").join(format!("{NIGHT}_gain0"))).unwrap();
    let report = monitor
        .refresh_status(night(), LayoutConvention::Science, None)
        .unwrap();
    assert_eq!(report.empty_reason, Some(EmptyReason::NotStarted));
}

#[test]
fn test_missing_layout_root_fails_request() {
    let tree = PipelineTree::new();
    fs::remove_dir_all(&tree.config.masterframe_root).unwrap();

    let monitor = Monitor::new(tree.config.clone()).unwrap();
    let err = monitor
        .aggregate_status(night(), LayoutConvention::Masterframe, None)
        .unwrap_err();
    assert!(matches!(err, MonitorError::RootMissing(_)));
}
