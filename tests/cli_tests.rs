// Integration tests for the cbrw binary: input modes, output formats and
// error reporting.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const OBSERVATIONS: &str = r#"[
    {"color": "red", "shape": "circle"},
    {"color": "red", "shape": "square"},
    {"color": "blue", "shape": "circle"}
]"#;

#[test]
fn test_text_report_from_file() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("obs.json");
    fs::write(&input, OBSERVATIONS).unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("observations: 3"))
        .stdout(predicate::str::contains("color=red"))
        .stdout(predicate::str::contains("color=blue & shape=circle: 1"));
}

#[test]
fn test_json_report_from_stdin() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.arg("--format").arg("json").write_stdin(OBSERVATIONS);

    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["n_obs"], 3);
    assert_eq!(report["pairs"].as_array().unwrap().len(), 4);
    assert_eq!(report["pairs"][0]["feature"], "color");
    assert_eq!(report["pairs"][0]["value"], "red");
    assert_eq!(report["pairs"][0]["count"], 2);
}

#[test]
fn test_json_lines_input() {
    let tmp_dir = TempDir::new().unwrap();
    let input = tmp_dir.path().join("obs.jsonl");
    fs::write(
        &input,
        "{\"color\": \"red\"}\n\n{\"color\": \"red\", \"size\": 2}\n",
    )
    .unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.arg("--lines").arg("--format").arg("json").arg(&input);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"n_obs\": 2"));
}

#[test]
fn test_invalid_observation_reports_line() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.arg("--lines")
        .write_stdin("{\"color\": \"red\"}\n{\"color\": [\"red\"]}\n");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("color"));
}

#[test]
fn test_scalar_document_is_invalid_argument() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.write_stdin("42");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_missing_file_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cbrw");
    cmd.arg("/nonexistent/observations.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}
