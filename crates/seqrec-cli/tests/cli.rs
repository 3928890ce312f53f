// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end runs of the `seqrec` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "query_key": "query_id",
    "features": [
        { "name": "query_id", "dtype": "string", "role": "context" },
        { "name": "score", "dtype": "float", "role": "sequence" },
        { "name": "click", "dtype": "int", "role": "sequence" }
    ]
}"#;

const ROWS: &str = r#"{"query_id": "q1", "score": 0.5, "click": 1}
{"query_id": "q2", "score": 0.25}
{"query_id": "q1", "score": 0.75, "click": 0}
"#;

fn seqrec() -> Command {
    Command::new(env!("CARGO_BIN_EXE_seqrec"))
}

fn fixture() -> (TempDir, String, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("features.json");
    let rows = dir.path().join("rows.jsonl");
    fs::write(&config, CONFIG).expect("write config");
    fs::write(&rows, ROWS).expect("write rows");
    let config = config.to_string_lossy().into_owned();
    let rows = rows.to_string_lossy().into_owned();
    (dir, config, rows)
}

#[test]
fn encode_writes_one_line_per_good_group() {
    let (_dir, config, rows) = fixture();
    let assert = seqrec()
        .args(["encode", "--feature-config", &config, "--input", &rows])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping group"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["key"], "q1");
    assert_eq!(lines[0]["rows"], 2);
    assert_eq!(
        lines[0]["record"]["context_features"]["query_id"]["value"],
        serde_json::json!([[113, 49]])
    );
    assert_eq!(
        lines[0]["record"]["sequence_features"]["score"][0]["value"],
        serde_json::json!([0.5, 0.75])
    );
    assert_eq!(
        lines[0]["record"]["sequence_features"]["click"][0]["value"],
        serde_json::json!([1, 0])
    );
}

#[test]
fn fail_fast_aborts_on_bad_group() {
    let (_dir, config, rows) = fixture();
    seqrec()
        .args([
            "encode",
            "--feature-config",
            &config,
            "--input",
            &rows,
            "--fail-fast",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("q2"));
}

#[test]
fn inline_config_and_stdin_input() {
    seqrec()
        .args([
            "encode",
            "--feature-config",
            CONFIG,
            "--group-key",
            "query_id",
        ])
        .write_stdin("{\"query_id\": \"q9\", \"score\": 1, \"click\": 1}\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key\":\"q9\""));
}

#[test]
fn output_file_receives_records() {
    let (dir, config, rows) = fixture();
    let out = dir.path().join("records.jsonl");
    seqrec()
        .args(["encode", "--feature-config", &config, "--input", &rows])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let written = fs::read_to_string(&out).expect("read output");
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn types_lists_builtin_tags() {
    seqrec()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::eq("string\nfloat\nint\n"));
}

#[test]
fn check_rejects_unregistered_dtype() {
    let doc = r#"{"features": [
        { "name": "day", "dtype": "date", "role": "context" },
        { "name": "score", "dtype": "float", "role": "sequence" }
    ]}"#;
    seqrec()
        .args(["check", "--feature-config", doc])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unregistered"));
}

#[test]
fn check_accepts_valid_config() {
    seqrec()
        .args(["check", "--feature-config", CONFIG])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok: 1 context, 2 sequence"));
}

#[test]
fn missing_group_key_is_reported() {
    let doc = r#"{"features": [{ "name": "a", "dtype": "int", "role": "context" }]}"#;
    seqrec()
        .args(["encode", "--feature-config", doc])
        .write_stdin("{\"a\": 1}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--group-key"));
}
