//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `bterm` binary and verify exit codes,
//! stdout content and stderr content. Model snapshots and config files
//! are written to a temporary directory per test.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
  "contexts": [
    { "name": "C0", "sets": ["S"], "constants": [{ "name": "limit", "type": "INT" }] }
  ],
  "machines": [
    { "name": "M0", "variables": [{ "name": "a", "type": "INT" }] },
    { "name": "M1", "refines": "M0", "sees": ["C0"],
      "variables": [{ "name": "x", "type": "INT" }, { "name": "s", "type": "POW(S)" }],
      "events": [
        { "label": "inc", "parameters": [{ "name": "d", "type": "INT" }] },
        { "label": "reset" }
      ] }
  ]
}"#;

/// Writes the standard snapshot and returns its directory and path.
fn snapshot() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("model.json");
    fs::write(&path, SNAPSHOT).expect("write snapshot");
    (dir, path)
}

fn bterm() -> Command {
    cargo_bin_cmd!("bterm")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    bterm()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wire terms"));
}

#[test]
fn version_exits_0() {
    bterm()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bterm"));
}

// ──────────────────────────────────────────────
// 2. Expressions and predicates
// ──────────────────────────────────────────────

#[test]
fn expr_prints_wrapped_term() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["expr", "x + 1", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout("bexpr(add(none,identifier(none,x),integer(none,1)))\n");
}

#[test]
fn pred_accepts_ascii_and_seen_context_names() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["pred", "x <= limit & s <: S", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bpred(conjunct(none,less_equal("));
}

#[test]
fn no_wrap_drops_wrapper() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["pred", "limit > 0", "--root", "context:C0", "--no-wrap", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout("greater(none,identifier(none,limit),integer(none,0))\n");
}

#[test]
fn unknown_identifier_exits_1_with_message() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["pred", "y = z", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown identifier: [y, z]"));
}

#[test]
fn parse_error_exits_1() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["pred", "x = ", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn json_output_for_terms_and_errors() {
    let (_dir, model) = snapshot();
    let out = bterm()
        .args(["expr", "x", "--root", "machine:M1", "--output", "json", "--model"])
        .arg(&model)
        .output()
        .expect("run bterm");
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(v["functor"], "bexpr");
    assert_eq!(v["args"][0]["functor"], "identifier");

    bterm()
        .args(["expr", "q", "--root", "machine:M1", "--output", "json", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"kind\": \"typecheck\""));
}

// ──────────────────────────────────────────────
// 3. Transitions
// ──────────────────────────────────────────────

#[test]
fn trans_with_parameters_and_post_state() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["trans", "inc | x' = x + d & a' = a", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("btrans(event(inc,conjunct("));
}

#[test]
fn trans_without_predicate() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["trans", "reset", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout("btrans(event(reset))\n");
}

#[test]
fn trans_unknown_event_exits_1() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["trans", "halt", "--root", "machine:M1", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown event halt"));
}

#[test]
fn trans_on_context_is_unsupported() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["trans", "inc", "--root", "context:C0", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "only supported when animating machines",
        ));
}

#[test]
fn missing_machine_reports_database_guidance() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["pred", "x = 1", "--root", "machine:M9", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Try cleaning your workspace."));
}

// ──────────────────────────────────────────────
// 4. Inputs, normalize and config
// ──────────────────────────────────────────────

#[test]
fn bad_root_is_a_usage_error() {
    let (_dir, model) = snapshot();
    bterm()
        .args(["expr", "x", "--root", "theory:T", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown model kind"));
}

#[test]
fn missing_snapshot_exits_1() {
    bterm()
        .args(["expr", "x", "--root", "machine:M1", "--model", "/nonexistent/model.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn quiet_silences_text_errors_but_not_json_errors() {
    bterm()
        .args(["expr", "x", "--root", "machine:M1", "--quiet", "--model", "/nonexistent/model.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::is_empty());

    bterm()
        .args([
            "expr", "x", "--root", "machine:M1", "--quiet", "--output", "json", "--model",
            "/nonexistent/model.json",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("\"error\"").and(predicate::str::contains("could not read")));
}

#[test]
fn normalize_prints_mathematical_notation() {
    bterm()
        .args(["normalize", "x : NAT & order /= 0"])
        .assert()
        .success()
        .stdout("x \u{2208} \u{2115} \u{2227} order \u{2260} 0\n");
}

#[test]
fn config_file_sets_defaults_and_flags_override() {
    let (dir, model) = snapshot();
    let config = dir.path().join("bterm.toml");
    fs::write(&config, "[output]\nwrap = false\nformat = \"text\"\n").expect("write config");

    bterm()
        .args(["expr", "x", "--root", "machine:M1", "--config"])
        .arg(&config)
        .arg("--model")
        .arg(&model)
        .assert()
        .success()
        .stdout("identifier(none,x)\n");

    bterm()
        .args(["expr", "x", "--root", "machine:M1", "--output", "json", "--config"])
        .arg(&config)
        .arg("--model")
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"functor\": \"identifier\""));
}

#[test]
fn invalid_config_exits_1() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("bterm.toml");
    fs::write(&config, "[output\n").expect("write config");
    bterm()
        .args(["normalize", "x", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("could not parse config"));
}
