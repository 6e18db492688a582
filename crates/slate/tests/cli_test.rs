//! Integration tests for the `slate` CLI binary.
//!
//! Argument parsing, help output, completions and error exits run
//! without a backend; the data commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `slate` binary with env isolation.
///
/// Clears all `SLATE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn slate_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("slate");
    cmd.env("HOME", "/tmp/slate-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/slate-cli-test-nonexistent")
        .env_remove("SLATE_PROFILE")
        .env_remove("SLATE_API_URL")
        .env_remove("SLATE_TOKEN")
        .env_remove("SLATE_ORG")
        .env_remove("SLATE_OUTPUT")
        .env_remove("SLATE_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary against `server` on a blocking thread so the mock
/// server keeps serving.
async fn run_against(server: &MockServer, args: Vec<String>) -> std::process::Output {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        slate_cmd()
            .args(["--api-url", &uri, "--token", "test-token", "--color", "never"])
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
    let output = slate_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    slate_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("film productions")
            .and(predicate::str::contains("invoices"))
            .and(predicate::str::contains("transactions"))
            .and(predicate::str::contains("projects")),
    );
}

#[test]
fn test_version_flag() {
    slate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("slate"));
}

#[test]
fn test_completions_zsh() {
    slate_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    slate_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = slate_cmd().arg("dailies").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("dailies"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    slate_cmd()
        .args(["--output", "xml", "projects", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_amount_is_rejected_by_parser() {
    let output = slate_cmd()
        .args(["transactions", "create", "--type", "expense", "--amount", "12.345"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("invalid amount"));
}

#[test]
fn test_projects_list_without_config() {
    slate_cmd()
        .args(["projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slate config init"));
}

#[test]
fn test_unknown_profile() {
    slate_cmd()
        .args(["--profile", "festival", "projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("festival"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    slate_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    slate_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    slate_cmd()
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "set", "site", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn test_config_set_then_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let isolated = || {
        let mut cmd = slate_cmd();
        cmd.env("HOME", dir.path()).env("XDG_CONFIG_HOME", dir.path());
        cmd
    };

    isolated()
        .args(["--profile", "studio", "config", "set", "api_url", "https://api.slate.film/v1"])
        .assert()
        .success();
    isolated()
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("studio"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_invoices_list_json() {
    let server = MockServer::start().await;
    let org = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(query_param("organization_id", org.to_string()))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "organization_id": org,
            "number": "INV-0007",
            "status": "paid",
            "currency": "EUR",
            "total_cents": 120_000,
            "paid_cents": 120_000
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        vec!["--org".into(), org.to_string(), "-o".into(), "json".into(), "invoices".into(), "list".into()],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body[0]["number"], "INV-0007");
    assert_eq!(body[0]["total_cents"], 120_000);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_without_org_exits_with_usage() {
    let server = MockServer::start().await;

    let output = run_against(&server, vec!["invoices".into(), "list".into()]).await;

    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No organization selected"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_failure_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "session expired"})))
        .mount(&server)
        .await;

    let output = run_against(
        &server,
        vec!["--org".into(), Uuid::new_v4().to_string(), "projects".into(), "list".into()],
    )
    .await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("session expired"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invite_resend_prints_link() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("POST"))
        .and(path(format!("/invites/{id}/resend")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"invite_link": "https://app.slate.film/join/abc123"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, vec!["invites".into(), "resend".into(), id.to_string()]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://app.slate.film/join/abc123"
    );
}
