//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn demo_json() -> &'static str {
    r#"{
  "name": "Demo",
  "source_sheet_id": "template-1",
  "jury": [
    { "name": "X", "weight": 100 },
    { "name": "Y", "weight": 50 }
  ],
  "contestants": [
    { "name": "A" },
    { "name": "B" }
  ]
}"#
}

fn scoregen() -> Command {
    Command::cargo_bin("scoregen").unwrap()
}

#[test]
fn test_validate_accepts_valid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Demo.json");
    fs::write(&path, demo_json()).unwrap();

    scoregen()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All files valid"));
}

#[test]
fn test_validate_rejects_missing_jury() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Broken.json");
    fs::write(
        &path,
        r#"{"name":"Broken","source_sheet_id":"t","jury":[],"contestants":[{"name":"A"}]}"#,
    )
    .unwrap();

    scoregen()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("at least one juror"));
}

#[test]
fn test_validate_rejects_unreadable_file() {
    scoregen()
        .arg("validate")
        .arg("does-not-exist.json")
        .assert()
        .failure();
}

#[test]
fn test_show_prints_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Demo.json");
    fs::write(&path, demo_json()).unwrap();

    scoregen()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Demo")
                .and(predicate::str::contains("weight 50"))
                .and(predicate::str::contains("Ready for generation")),
        );
}

#[test]
fn test_list_shows_stored_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("Demo.json"), demo_json()).unwrap();

    scoregen()
        .arg("list")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo.json"));
}

#[test]
fn test_list_empty_dir_is_fine() {
    let dir = tempdir().unwrap();
    scoregen()
        .arg("list")
        .arg("--dir")
        .arg(dir.path().join("nothing-here"))
        .assert()
        .success()
        .stdout(predicate::str::contains("(none)"));
}

#[test]
fn test_simulate_runs_whole_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Demo.json");
    fs::write(&path, demo_json()).unwrap();

    scoregen()
        .arg("simulate")
        .arg(&path)
        .arg("--marker")
        .arg("5:C")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Generation complete.")
                .and(predicate::str::contains("Generation Results"))
                .and(predicate::str::contains("AM2"))
                .and(predicate::str::contains("6 rows after expansion")),
        );
}

#[test]
fn test_simulate_rejects_malformed_marker() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Demo.json");
    fs::write(&path, demo_json()).unwrap();

    scoregen()
        .arg("simulate")
        .arg(&path)
        .arg("--marker")
        .arg("five:C")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a row number"));
}
