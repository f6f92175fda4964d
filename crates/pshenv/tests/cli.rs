//! CLI integration tests.
//!
//! Runs the built `pshenv` binary against a temporary `.env` file with a
//! cleared process environment.

#![allow(clippy::pedantic)]
#![cfg(feature = "cli")]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pshenv::decode::encode_value;
use serde_json::{Value, json};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

/// Writes a `.env` file into a fresh directory.
fn dotenv_dir(lines: &[String]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".env"), lines.join("\n")).unwrap();
    dir
}

/// Runs the binary with only `vars` in its process environment.
fn run(dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pshenv"))
        .env_clear()
        .envs(vars.iter().copied())
        .current_dir(dir)
        .arg("--dotenv")
        .arg(dir.join(".env"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn get_raw_variable_prefers_dotenv() {
    let dir = dotenv_dir(&["PLATFORM_BRANCH=from-dotenv".to_string()]);
    let output = run(dir.path(), &[("PLATFORM_BRANCH", "from-process")], &["get", "Branch"]);
    assert_eq!(stdout(&output), "from-dotenv\n");
}

#[test]
fn get_falls_back_to_process() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[("PLATFORM_TREE_ID", "abc")], &["get", "TreeID"]);
    assert_eq!(stdout(&output), "abc\n");
}

#[test]
fn get_decoded_alias_prints_json() {
    let vars = encode_value(&json!({"env:LOG": "debug", "level": 3})).unwrap();
    let dir = dotenv_dir(&[format!("PLATFORM_VARIABLES='{vars}'")]);

    let output = run(dir.path(), &[], &["get", "Vars"]);
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value, json!({"env:LOG": "debug", "level": 3}));
}

#[test]
fn prefix_is_configurable() {
    let dir = dotenv_dir(&["CUSTOM_BRANCH=feature".to_string()]);
    let output = run(dir.path(), &[("PSHENV_PREFIX", "CUSTOM_")], &["get", "Branch"]);
    assert_eq!(stdout(&output), "feature\n");
}

#[test]
fn schema_lists_every_variable() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[], &["schema"]);
    let table: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();

    assert_eq!(table.len(), pshenv::schema::VARIABLES.len());
    let port = table.iter().find(|v| v["name"] == "Port").unwrap();
    assert_eq!(port["key"], "PORT");
    assert_eq!(port["no_prefix"], true);
}

#[test]
fn export_renders_merged_layers() {
    let dir = dotenv_dir(&["PLATFORM_BRANCH=from-dotenv".to_string(), "PORT=8080".to_string()]);
    let output = run(
        dir.path(),
        &[("PLATFORM_BRANCH", "from-process"), ("PLATFORM_PROJECT", "proj")],
        &["export"],
    );
    let text = stdout(&output);

    assert!(text.contains("PLATFORM_BRANCH=\"from-dotenv\"\n"), "{text}");
    assert!(text.contains("PLATFORM_PROJECT=\"proj\"\n"), "{text}");
    assert!(text.contains("PORT=8080\n"), "{text}");
    assert!(!text.contains("from-process"), "{text}");
}

#[test]
fn bind_reports_tcp_address() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[("PORT", "0")], &["bind"]);
    assert!(stdout(&output).starts_with("tcp://127.0.0.1:"));
}

#[test]
fn bind_without_listener_fails() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[], &["bind"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("found neither SOCKET nor PORT"));
}

#[test]
fn unknown_variable_fails() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[], &["get", "Nope"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown variable"));
}

#[test]
fn unset_variable_fails() {
    let dir = dotenv_dir(&[]);
    let output = run(dir.path(), &[], &["get", "Branch"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("PLATFORM_BRANCH is not set"));
}
