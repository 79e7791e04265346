// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowc contributors

//! Smoke tests for the flowc binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const VALID_PIPELINE: &str = r#"
name: "smoke"
nodes:
  - name: source
    outputs:
      - name: data
        type: text
  - name: sink
    inputs:
      - name: data
        type: text
channels:
  - from: source.data
    to: sink.data
"#;

const BROKEN_PIPELINE: &str = r#"
name: "broken"
nodes:
  - name: source
    outputs:
      - name: data
        type: text
  - name: sink
    inputs:
      - name: data
        type: integer
channels:
  - from: source.data
    to: sink.data
"#;

fn write_pipeline(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("flow.yaml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_accepts_a_valid_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pipeline(&dir, VALID_PIPELINE);

    Command::cargo_bin("flowc")
        .unwrap()
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline is valid"));
}

#[test]
fn validate_rejects_a_type_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pipeline(&dir, BROKEN_PIPELINE);

    Command::cargo_bin("flowc")
        .unwrap()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("type mismatch"));
}

#[test]
fn validate_emits_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pipeline(&dir, BROKEN_PIPELINE);

    let output = Command::cargo_bin("flowc")
        .unwrap()
        .arg("validate")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["diagnostics"][0]["kind"], "type_mismatch");
}

#[test]
fn validate_reports_missing_file() {
    Command::cargo_bin("flowc")
        .unwrap()
        .arg("validate")
        .arg("no/such/flow.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn graph_renders_dot() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pipeline(&dir, VALID_PIPELINE);

    Command::cargo_bin("flowc")
        .unwrap()
        .arg("graph")
        .arg(&path)
        .arg("--format")
        .arg("dot")
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph pipeline"))
        .stdout(predicate::str::contains("\"source\" -> \"sink\""));
}

#[test]
fn graph_refuses_invalid_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_pipeline(&dir, BROKEN_PIPELINE);

    Command::cargo_bin("flowc")
        .unwrap()
        .arg("graph")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("type mismatch"));
}
