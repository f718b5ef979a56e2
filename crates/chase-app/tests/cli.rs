use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_board_data(dir: &TempDir) {
    fs::write(dir.path().join("taxi.txt"), "1:2,3\n2:1,3\n3:1,2\n").unwrap();
    fs::write(dir.path().join("bus.txt"), "1:4\n4:1\n").unwrap();
    fs::write(dir.path().join("subway.txt"), "").unwrap();
    fs::write(dir.path().join("boat.txt"), "").unwrap();
    fs::write(dir.path().join("coords.txt"), "10,10\n60,10\n10,60\n60,60\n").unwrap();
}

#[test]
fn help_prints_usage() {
    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: nychase"));
}

#[test]
fn unknown_flag_fails_with_message() {
    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command: --frobnicate"));
}

#[test]
fn inspect_missing_snapshot_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--inspect-snapshot")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Snapshot not found"));
}

#[test]
fn inspect_snapshot_reports_the_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snap.json");
    fs::write(
        &path,
        r#"{ "detectives": [7, 12], "barrages": [30], "candidates": [4, 9] }"#,
    )
    .unwrap();

    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--inspect-snapshot")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Detectives: 7, 12"))
        .stdout(predicate::str::contains("Barrages: 30"))
        .stdout(predicate::str::contains("Mister X candidates (2): 4, 9"));
}

#[test]
fn piped_session_runs_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    write_board_data(&dir);

    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--data")
        .arg(dir.path())
        .arg("--out")
        .arg(dir.path().join("out.png"))
        .write_stdin("0\n0\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome to the Super Police Computer"))
        .stdout(predicate::str::contains("Good hunting."));
}

#[test]
fn missing_board_data_fails_the_session() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("nychase")
        .unwrap()
        .arg("--data")
        .arg(dir.path())
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Board data error"));
}
