//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a qct command
pub fn qct() -> Command {
    Command::new(cargo::cargo_bin!("qct"))
}

/// Helper to create an initialized workspace in a temp directory
pub fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    qct().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Extract the first token starting with the given ID prefix from output
fn extract_id(stdout: &str, prefix: &str) -> String {
    stdout
        .lines()
        .find(|l| l.contains(prefix))
        .and_then(|l| l.split_whitespace().find(|w| w.starts_with(prefix)))
        .map(|s| s.to_string())
        .unwrap_or_default()
}

/// Helper to create a test exigence with one pass/fail checklist item
pub fn create_test_exigence(tmp: &TempDir, name: &str, code: &str) -> String {
    let output = qct()
        .current_dir(tmp.path())
        .args([
            "exg",
            "new",
            "--name",
            name,
            "--code",
            code,
            "--pieces-per-sample",
            "30",
            "--check",
            "Visual state",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    extract_id(&String::from_utf8_lossy(&output.stdout), "EXG-")
}

/// Helper to create a test order referencing an exigence by code
pub fn create_test_order(tmp: &TempDir, number: &str, pieces: &str, exigence: &str) -> String {
    let output = qct()
        .current_dir(tmp.path())
        .args([
            "ord", "new", "--number", number, "--pieces", pieces, "--exigence", exigence,
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    extract_id(&String::from_utf8_lossy(&output.stdout), "ORD-")
}
