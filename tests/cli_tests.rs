//! Workspace and seed-data tests

mod common;

use common::{qct, setup_workspace};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_init_creates_collection_files() {
    let tmp = setup_workspace();

    let data_dir = tmp.path().join(".qct");
    assert!(data_dir.is_dir());
    assert!(data_dir.join("exigences.json").exists());
    assert!(data_dir.join("orders.json").exists());
    assert!(data_dir.join("operations.json").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = setup_workspace();

    qct()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_seed_data_is_present() {
    let tmp = setup_workspace();

    qct()
        .current_dir(tmp.path())
        .args(["ord", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CMD-1001"))
        .stdout(predicate::str::contains("120"))
        .stdout(predicate::str::contains("Standard quality control"));

    qct()
        .current_dir(tmp.path())
        .args(["exg", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("STD-CTRL"));
}

#[test]
fn test_seed_order_requires_four_samples() {
    let tmp = setup_workspace();

    // 120 pieces at one sample per 30 (min 1, max 10)
    qct()
        .current_dir(tmp.path())
        .args(["ord", "show", "CMD-1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4 required"));
}

#[test]
fn test_commands_fail_outside_workspace() {
    let tmp = TempDir::new().unwrap();

    qct()
        .current_dir(tmp.path())
        .args(["exg", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("qct init"));
}

#[test]
fn test_workspace_discovered_from_subdirectory() {
    let tmp = setup_workspace();
    let nested = tmp.path().join("shopfloor/line-2");
    std::fs::create_dir_all(&nested).unwrap();

    qct()
        .current_dir(&nested)
        .args(["ord", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CMD-1001"));
}
