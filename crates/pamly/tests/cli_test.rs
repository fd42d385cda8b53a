//! Integration tests for the `pamly` CLI binary.
//!
//! Argument parsing, help output, completions and config errors run without
//! an appliance; the workflow tests point the binary at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASK_ID: &str = "3f8e2a8c-1d4b-4c55-9a3e-6f0b7c2d9e11";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `pamly` binary with env isolation.
///
/// Clears all `PAMLY_*` env vars and points config directories at `home`
/// so tests never touch the user's real configuration.
fn pamly_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("pamly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("PAMLY_PROFILE")
        .env_remove("PAMLY_APPLIANCE")
        .env_remove("PAMLY_TOKEN")
        .env_remove("PAMLY_OUTPUT")
        .env_remove("PAMLY_INSECURE")
        .env_remove("PAMLY_TIMEOUT")
        .env_remove("PAMLY_USERNAME")
        .env_remove("PAMLY_PASSWORD");
    cmd
}

fn isolated() -> assert_cmd::Command {
    pamly_cmd(Path::new("/tmp/pamly-cli-test-nonexistent"))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn api_path(suffix: &str) -> String {
    format!("/service/core/v4/{suffix}")
}

/// Run the binary against `server` with a pre-issued token.
///
/// The child blocks, so it runs off the runtime threads serving the mock.
async fn run_against(server: &MockServer, args: &[&str]) -> Output {
    let uri = server.uri();
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || {
        isolated()
            .args(["--appliance", &uri, "--token", "test-token"])
            .args(&args)
            .output()
            .unwrap()
    })
    .await
    .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = isolated().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    isolated().arg("--help").assert().success().stdout(
        predicate::str::contains("requests")
            .and(predicate::str::contains("accounts"))
            .and(predicate::str::contains("cluster")),
    );
}

#[test]
fn test_version_flag() {
    isolated()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pamly"));
}

#[test]
fn test_requests_help_lists_lifecycle() {
    isolated().args(["requests", "--help"]).assert().success().stdout(
        predicate::str::contains("checkout")
            .and(predicate::str::contains("close"))
            .and(predicate::str::contains("checkin")),
    );
}

#[test]
fn test_task_commands_require_ids() {
    let output = isolated()
        .args(["accounts", "change-password"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    isolated()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pamly"));
}

#[test]
fn test_completions_zsh() {
    isolated()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_follows_xdg() {
    let home = tempfile::tempdir().unwrap();
    let expected = home.path().join("pamly").join("config.toml");
    pamly_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_config_show_masks_password() {
    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("pamly");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        r#"
default_profile = "lab"

[profiles.lab]
appliance = "https://pam.lab.example.com"
username = "admin"
password = "hunter2"
"#,
    )
    .unwrap();

    pamly_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://pam.lab.example.com")
                .and(predicate::str::contains("****"))
                .and(predicate::str::contains("hunter2").not()),
        );
}

#[test]
fn test_missing_config_is_a_usage_error() {
    let output = isolated().args(["users", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No appliance configured"));
}

#[test]
fn test_appliance_without_credentials_is_an_auth_error() {
    let output = isolated()
        .args(["--appliance", "https://pam.example.com", "users", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No credentials"));
}

#[test]
fn test_unknown_profile() {
    let output = isolated()
        .args(["--profile", "nope", "--token", "t", "users", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("Profile 'nope' not found"));
}

// ── Against a mock appliance ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_users_list_json_sends_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("Users")))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"Id": 1, "Name": "admin"},
            {"Id": 7, "Name": "auditor", "Disabled": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["-o", "json-compact", "users", "list"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let users: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(users[1]["Name"], "auditor");
    assert_eq!(users[1]["Disabled"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_record_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("Assets/99")))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"Code": 70000, "Message": "Asset not found"})),
        )
        .mount(&server)
        .await;

    let output = run_against(&server, &["assets", "get", "99"]).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("asset '99' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_prints_password() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/2-5-7-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "2-5-7-1", "State": "RequestAvailable", "AccountId": 5, "AssetId": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/2-5-7-1/CheckOutPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"s3cr3t!\""))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["requests", "checkout", "2-5-7-1"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "\"s3cr3t!\"");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_checkout_pending_without_wait_is_a_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/2-5-7-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "2-5-7-1", "State": "PendingApproval", "AccountId": 5, "AssetId": 2
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["requests", "checkout", "2-5-7-1"]).await;
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("still PendingApproval"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_denied_request_is_rejected_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/2-5-7-9")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "2-5-7-9", "State": "Denied", "AccountId": 5, "AssetId": 2
        })))
        .mount(&server)
        .await;

    let output = run_against(&server, &["requests", "close", "2-5-7-9"]).await;
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("Cannot close access request 2-5-7-9 in state Denied"));
    let posts = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(posts, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_password_waits_for_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("AssetAccounts/5/CheckPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": TASK_ID,
            "LogTime": "2024-05-01T08:00:00Z",
            "AccountId": 5,
            "AccountName": "svc_backup",
            "Name": "CheckPassword"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordCheckTaskId": TASK_ID,
            "LastSuccessPasswordCheckDate": "2024-05-01T08:00:02Z"
        }])))
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["-o", "plain", "accounts", "check-password", "5", "--wait", "10"],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5\tsucceeded");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_change_password_failure_sets_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("AssetAccounts/5/ChangePassword")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": TASK_ID,
            "LogTime": "2024-05-01T08:00:00Z",
            "AccountId": 5,
            "Name": "ChangePassword"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordChangeTaskId": TASK_ID,
            "LastFailurePasswordChangeDate": "2024-05-01T08:00:02Z",
            "FailedPasswordChangeAttempts": 1
        }])))
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        &["-o", "plain", "accounts", "change-password", "5", "--wait", "10"],
    )
    .await;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "5\tfailed");
    assert!(combined_output(&output).contains("1 of 1 account jobs did not succeed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_change_password_without_wait_only_submits() {
    let server = MockServer::start().await;
    for account in [5, 6] {
        Mock::given(method("POST"))
            .and(path(api_path(&format!("AssetAccounts/{account}/ChangePassword"))))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Id": TASK_ID,
                "LogTime": "2024-05-01T08:00:00Z",
                "AccountId": account,
                "Name": "ChangePassword"
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let output = run_against(
        &server,
        &["-o", "plain", "accounts", "change-password", "5", "6", "--wait", "0"],
    )
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "5\tsubmitted\n6\tsubmitted"
    );
    let polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "GET")
        .count();
    assert_eq!(polls, 0);
}
