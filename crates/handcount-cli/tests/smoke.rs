use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

const SCRIPT: &str = r#"
players: ["Ana", "Bruno", "Caio"]
time_limit_seconds: 45
rounds:
  - first_player: 0
    held: [0, 0, 3]
  - first_player: 1
    held: [7, 0, 2]
finish: true
"#;

#[test]
fn replay_prints_final_snapshot_and_standings() {
    let dir = tempdir().expect("temp dir");
    let script = dir.path().join("match.yaml");
    fs::write(&script, SCRIPT).expect("write script");

    let output = Command::cargo_bin("handcount")
        .expect("binary built")
        .arg("replay")
        .arg(&script)
        .output()
        .expect("replay runs");
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(report["snapshot"]["phase"], "result");
    assert_eq!(report["snapshot"]["scores"], serde_json::json!([-4, 12, -5]));
    assert_eq!(report["snapshot"]["time_limit_seconds"], 45);
    assert_eq!(report["snapshot"]["rounds"][1]["round"], 2);
    assert_eq!(report["standings"]["winner"]["name"], "Bruno");
    assert_eq!(
        report["signals"].as_array().map(Vec::len),
        Some(3),
        "two rounds plus the finish"
    );
}

#[test]
fn replay_rejects_negative_points() {
    let dir = tempdir().expect("temp dir");
    let script = dir.path().join("bad.yaml");
    fs::write(&script, SCRIPT.replace("[7, 0, 2]", "[7, 0, -2]")).expect("write script");

    Command::cargo_bin("handcount")
        .expect("binary built")
        .args(["replay", "--pretty"])
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("round 2"));
}

#[test]
fn replay_reports_missing_script() {
    Command::cargo_bin("handcount")
        .expect("binary built")
        .args(["replay", "no/such/script.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn play_scores_a_round_from_stdin() {
    let input = "first 2\ngo\nend\nyes\nscore 6\nscore\nstatus\nquit\n";

    Command::cargo_bin("handcount")
        .expect("binary built")
        .args(["play", "--players", "Ana,Bruno", "--time-limit", "30"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Bruno opens the round"))
        .stdout(predicate::str::contains("points held by Bruno?"))
        .stdout(predicate::str::contains("total"))
        .stdout(predicate::str::contains("round 1 recorded"));
}

#[test]
fn play_goes_back_to_setup_and_reseats_kept_names() {
    let input = "back\ntime\nnames\nstatus\nquit\n";

    Command::cargo_bin("handcount")
        .expect("binary built")
        .args(["play", "--players", "Ana,Bruno"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("back to setup"))
        .stdout(predicate::str::contains("time limit: 1 minute 30 seconds"))
        .stdout(predicate::str::contains("seated Ana, Bruno"));
}

#[test]
fn play_rejects_time_limit_outside_presets() {
    Command::cargo_bin("handcount")
        .expect("binary built")
        .args(["play", "--time-limit", "50"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("time_limit_seconds"));
}
