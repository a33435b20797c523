//! Integration tests for the `propdesk` CLI binary.
//!
//! Argument parsing, help output, completions, offline lookups, and error
//! exit codes run without a server. Login runs against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NONEXISTENT_HOME: &str = "/tmp/propdesk-cli-test-nonexistent";

/// Build a [`Command`] for the `propdesk` binary with env isolation.
///
/// Clears all `PROPDESK_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn propdesk_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("propdesk");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("PROPDESK_PROFILE")
        .env_remove("PROPDESK_API_URL")
        .env_remove("PROPDESK_PROPERTY")
        .env_remove("PROPDESK_OUTPUT")
        .env_remove("PROPDESK_TIMEOUT")
        .env_remove("PROPDESK_USERNAME")
        .env_remove("PROPDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn propdesk_cmd() -> assert_cmd::Command {
    propdesk_cmd_in(Path::new(NONEXISTENT_HOME))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = propdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    propdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("properties")
            .and(predicate::str::contains("tickets"))
            .and(predicate::str::contains("tasks"))
            .and(predicate::str::contains("report")),
    );
}

#[test]
fn test_version_flag() {
    propdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("propdesk"));
}

#[test]
fn test_tasks_help_lists_move() {
    propdesk_cmd()
        .args(["tasks", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("move"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    propdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    propdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    propdesk_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = propdesk_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = propdesk_cmd()
        .args(["--output", "xml", "chains", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("xml"));
}

#[test]
fn test_tickets_list_without_config() {
    let output = propdesk_cmd().args(["tickets", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(text.contains("config"), "Expected a config hint:\n{text}");
}

#[test]
fn test_unknown_profile_is_not_found() {
    let output = propdesk_cmd()
        .args(["--profile", "staging", "tickets", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("staging"));
}

#[test]
fn test_report_page_lines_requires_export() {
    let output = propdesk_cmd()
        .args(["report", "tickets", "--page-lines", "20"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_config_show_without_file() {
    propdesk_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_chains_list() {
    propdesk_cmd()
        .args(["chains", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hampton Inn").and(predicate::str::contains("IHG")));
}

#[test]
fn test_chains_detect_from_property_name() {
    propdesk_cmd()
        .args(["-o", "plain", "chains", "detect", "Hampton Inn Downtown"])
        .assert()
        .success()
        .stdout(predicate::str::diff("HAM\n"));
}

#[test]
fn test_chains_detect_unknown_name() {
    propdesk_cmd()
        .args(["chains", "detect", "Bob's Motel"])
        .assert()
        .code(4);
}

#[test]
fn test_chains_rooms_unknown_chain() {
    let output = propdesk_cmd().args(["chains", "rooms", "XYZ"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("XYZ"));
}

#[test]
fn test_chains_rooms_json() {
    let output = propdesk_cmd()
        .args(["-o", "json", "chains", "rooms", "HAM"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(rows.as_array().is_some_and(|a| !a.is_empty()));
}

// ── Server round trips ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "demo", "password": "demo123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "user": {"id": 1, "username": "demo", "role": "manager"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let home_path = home.path().to_path_buf();
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        propdesk_cmd_in(&home_path)
            .env("PROPDESK_PASSWORD", "demo123")
            .args(["--api-url", &uri, "login", "--username", "demo"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    let text = combined_output(&output);
    assert!(output.status.success(), "login failed:\n{text}");
    assert!(text.contains("Logged in as demo"), "unexpected output:\n{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Invalid credentials"})))
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let home_path = home.path().to_path_buf();
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        propdesk_cmd_in(&home_path)
            .env("PROPDESK_PASSWORD", "wrong")
            .args(["--api-url", &uri, "login", "--username", "demo"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid credentials"));
}
