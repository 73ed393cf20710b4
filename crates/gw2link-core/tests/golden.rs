use std::fs;
use std::path::{Path, PathBuf};

use gw2link_core::{Snapshot, read_snapshot_file};

fn golden_dir(case: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(case)
}

fn load_expected_snapshot(case: &str) -> Snapshot {
    let expected_path = golden_dir(case).join("expected_snapshot.json");
    let expected_json = fs::read_to_string(&expected_path).expect("read expected_snapshot.json");
    serde_json::from_str(&expected_json).expect("parse expected snapshot")
}

fn run_golden(case: &str) {
    let input = golden_dir(case).join("input.bin");
    let expected = load_expected_snapshot(case);

    let actual = read_snapshot_file(&input).expect("decode segment");

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");
    assert_eq!(actual_value, expected_value, "golden mismatch in {case}");
}

#[test]
fn golden_queensdale() {
    run_golden("queensdale");
}

#[test]
fn golden_commander() {
    run_golden("commander");
}

#[test]
fn golden_partial_context() {
    run_golden("partial_context");
}

#[test]
fn golden_queensdale_is_the_reference_scenario() {
    let snapshot = load_expected_snapshot("queensdale");
    assert_eq!(snapshot.map_id, 15);
    assert_eq!(snapshot.build_id, 12345);
    assert_eq!(snapshot.ui_tick, 999);
    assert!(!snapshot.commander);
    assert_eq!(snapshot.position, [12, -4]);
}

#[test]
fn golden_commander_keeps_non_ascii_name() {
    let snapshot = load_expected_snapshot("commander");
    assert_eq!(snapshot.name, "Ærin Ŝtorm");
    assert!(snapshot.commander);
    assert_eq!(snapshot.ui_tick, 123_456_789_012);
}
