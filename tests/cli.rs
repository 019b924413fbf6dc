// ABOUTME: Integration tests for the promoter CLI.
// ABOUTME: Argument validation, validate-only runs, report output, and exit codes.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use support::write_bundle;

fn promoter_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("promoter"))
}

#[test]
fn help_shows_options() {
    promoter_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bundle"))
        .stdout(predicate::str::contains("--git-repo"))
        .stdout(predicate::str::contains("--workspace"))
        .stdout(predicate::str::contains("--validate-only"));
}

#[test]
fn source_is_required() {
    promoter_cmd()
        .args(["--workspace", "proj-dev"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bundle"));
}

#[test]
fn bundle_and_repo_are_exclusive() {
    promoter_cmd()
        .args([
            "--workspace",
            "proj-dev",
            "--bundle",
            "a.tar",
            "--git-repo",
            ".",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_bundle_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--bundle", "missing.tar"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source not found"));
}

#[test]
fn invalid_workspace_name_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", " padded ", "--git-repo", "."])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid workspace name"));
}

#[test]
fn validate_only_classifies_without_publishing() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(
        dir.path(),
        &[
            ("hello.ipynb", b"{}"),
            ("p1.pipeline.json", b"{}"),
            ("readme.md", b"# readme"),
        ],
        false,
    );

    promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-fabric-test", "--validate-only", "--bundle"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validated 2 artifact(s)"))
        .stdout(predicate::str::contains("(test)"))
        .stdout(predicate::str::contains("1 file(s) skipped"));
}

#[test]
fn validation_mode_fails_on_bad_dataflow() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = write_bundle(dir.path(), &[("bad.dataflow.json", b"{")], true);
    let report = dir.path().join("report.json");

    promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--mode", "validation", "--output", "quiet"])
        .arg("--bundle")
        .arg(&bundle)
        .arg("--report-file")
        .arg(&report)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("INVALID"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(saved["environment"], "dev");
    assert_eq!(saved["artifacts"][0]["kind"], "dataflow");
}

/// A project whose config points at a closed local port, with one notebook to deploy.
fn unreachable_project(dir: &Path) -> PathBuf {
    fs::write(
        dir.join("promoter.yml"),
        "api:\n  endpoint: http://127.0.0.1:1\n  timeout: 5s\nworkspaces:\n  proj-dev: ws-local\n",
    )
    .unwrap();
    write_bundle(dir, &[("hello.ipynb", b"{}")], false)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout))
        .expect("stdout should be a single JSON document")
}

#[test]
fn unreachable_service_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = unreachable_project(dir.path());
    let report = dir.path().join("report.json");

    let assert = promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--output", "json", "--bundle"])
        .arg(&bundle)
        .arg("--report-file")
        .arg(&report)
        .assert()
        .code(1);

    let printed = stdout_json(assert.get_output());
    assert_eq!(printed["status"], "FAILED");
    assert!(printed.get("rollback").is_none());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(saved["summary"]["total_failed"], 1);
    assert_eq!(saved["deployment_history"][0]["workspace_id"], "ws-local");
    assert_eq!(saved["deployment_history"][0]["outcome"], "FAILED");
}

#[test]
fn promote_mode_rolls_back_a_failed_run() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = unreachable_project(dir.path());
    let report = dir.path().join("report.json");

    let assert = promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--mode", "promote", "--output", "json"])
        .arg("--bundle")
        .arg(&bundle)
        .arg("--report-file")
        .arg(&report)
        .assert()
        .code(1);

    let printed = stdout_json(assert.get_output());
    assert_eq!(printed["status"], "FAILED");
    assert_eq!(printed["mode"], "promote");
    assert_eq!(printed["rollback"]["status"], "ROLLBACK_COMPLETED");
    assert_eq!(printed["rollback"]["actions"][0]["name"], "hello");
    assert_eq!(printed["rollback"]["actions"][0]["status"], "NOT_APPLIED");

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert!(saved.get("rollback").is_none());
}

#[test]
fn rollback_on_failure_flag_triggers_rollback() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = unreachable_project(dir.path());

    promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--rollback-on-failure", "--bundle"])
        .arg(&bundle)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Deployment failed, rolling back"))
        .stdout(predicate::str::contains("Rollback: ROLLBACK_COMPLETED"))
        .stdout(predicate::str::contains("hello: NOT_APPLIED"));
}

#[test]
fn no_rollback_suppresses_promote_rollback() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = unreachable_project(dir.path());

    let assert = promoter_cmd()
        .current_dir(dir.path())
        .args(["--workspace", "proj-dev", "--mode", "promote", "--no-rollback"])
        .args(["--output", "json", "--bundle"])
        .arg(&bundle)
        .assert()
        .code(1);

    let printed = stdout_json(assert.get_output());
    assert_eq!(printed["status"], "FAILED");
    assert!(printed.get("rollback").is_none());
}

#[test]
fn no_rollback_conflicts_with_rollback_on_failure() {
    promoter_cmd()
        .args([
            "--workspace",
            "proj-dev",
            "--bundle",
            "a.tar",
            "--no-rollback",
            "--rollback-on-failure",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
