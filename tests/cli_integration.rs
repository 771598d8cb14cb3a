//! CLI Integration Tests
//!
//! Runs the binary end-to-end: flag parsing, the tools dump, and full
//! stdio sessions against the JSON-RPC loop. Nothing here touches the
//! network; tool calls stop at argument validation or the missing
//! client id.

use std::time::Duration;

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

/// Get the binary to test.
fn onenote_mcp() -> Command {
    Command::cargo_bin("onenote-mcp").unwrap()
}

/// Command pinned to a scratch directory: no real config file, no
/// client id, credential cache under the temp dir.
fn hermetic(temp: &assert_fs::TempDir) -> Command {
    let mut cmd = onenote_mcp();
    cmd.current_dir(temp.path())
        .env_remove("AZURE_CLIENT_ID")
        .env_remove("ONENOTE_MCP_CONFIG")
        .arg("--cache-file")
        .arg(temp.child("cache.json").path())
        .timeout(Duration::from_secs(10));
    cmd
}

/// A cached credential that is still far from expiry.
const VALID_CACHE: &str = r#"{"accessToken":"test-token","expiresOn":"2099-01-01T00:00:00Z"}"#;

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    onenote_mcp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Model Context Protocol"));
}

#[test]
fn test_short_help_flag() {
    onenote_mcp().arg("-h").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    onenote_mcp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_short_version_flag() {
    onenote_mcp().arg("-V").assert().success().stdout(predicate::str::contains("onenote-mcp"));
}

#[test]
fn test_serve_command_help() {
    onenote_mcp()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stdio"));
}

#[test]
fn test_login_command_help() {
    onenote_mcp()
        .args(["login", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("device-code").and(predicate::str::contains("--force")));
}

#[test]
fn test_tools_command_help() {
    onenote_mcp()
        .args(["tools", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tool descriptors"));
}

// ============================================================================
// Tools Command Tests
// ============================================================================

#[test]
fn test_tools_prints_both_descriptors() {
    onenote_mcp()
        .arg("tools")
        .env_remove("ONENOTE_MCP_CONFIG")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("onenote-read")
                .and(predicate::str::contains("onenote-create")),
        );
}

#[test]
fn test_tools_output_is_valid_json() {
    let output = onenote_mcp()
        .arg("tools")
        .env_remove("ONENOTE_MCP_CONFIG")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let tools: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tools.as_array().unwrap().len(), 2);
}

// ============================================================================
// Serve Session Tests
// ============================================================================

#[test]
fn test_serve_initialize_handshake() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("2024-11-05")
                .and(predicate::str::contains("OneNote MCP Server")),
        );

    temp.close().unwrap();
}

#[test]
fn test_serve_is_the_default_command() {
    let temp = assert_fs::TempDir::new().unwrap();

    // No subcommand: the binary should speak MCP on stdio.
    hermetic(&temp)
        .write_stdin(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-11-05"));

    temp.close().unwrap();
}

#[test]
fn test_serve_reports_parse_errors() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin("{oops\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("-32700").and(predicate::str::contains("Parse error")));

    temp.close().unwrap();
}

#[test]
fn test_serve_rejects_unknown_methods() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin(r#"{"jsonrpc":"2.0","id":5,"method":"foo/bar"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Method not found: foo/bar"));

    temp.close().unwrap();
}

#[test]
fn test_serve_lists_tools() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("onenote-read")
                .and(predicate::str::contains("onenote-create")),
        );

    temp.close().unwrap();
}

#[test]
fn test_serve_validation_failure_stays_offline() {
    let temp = assert_fs::TempDir::new().unwrap();

    let line = r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"onenote-read","arguments":{"type":"list_sections"}}}"#;

    hermetic(&temp)
        .arg("serve")
        .write_stdin(line.to_string() + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("notebookId is required"))
        .stderr(predicate::str::contains("AZURE_CLIENT_ID not set"));

    temp.close().unwrap();
}

#[test]
fn test_serve_without_client_id_blocks_tool_calls() {
    let temp = assert_fs::TempDir::new().unwrap();

    // Valid arguments, so the call reaches the auth layer and stops there.
    let line = r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"onenote-read","arguments":{"type":"list_notebooks"}}}"#;

    hermetic(&temp)
        .arg("serve")
        .write_stdin(line.to_string() + "\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("-32603")
                .and(predicate::str::contains("AZURE_CLIENT_ID is not set")),
        );

    temp.close().unwrap();
}

#[test]
fn test_serve_notifications_produce_no_output() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    temp.close().unwrap();
}

#[test]
fn test_serve_answers_requests_in_order() {
    let temp = assert_fs::TempDir::new().unwrap();

    let session = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );

    let output = hermetic(&temp).arg("serve").write_stdin(session).assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let ids: Vec<i64> = stdout
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [1, 2]);

    temp.close().unwrap();
}

// ============================================================================
// Login Command Tests
// ============================================================================

#[test]
fn test_login_without_client_id_fails() {
    let temp = assert_fs::TempDir::new().unwrap();

    hermetic(&temp)
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("AZURE_CLIENT_ID"));

    temp.close().unwrap();
}

#[test]
fn test_login_reuses_valid_cached_credential() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("cache.json").write_str(VALID_CACHE).unwrap();

    hermetic(&temp)
        .arg("login")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already signed in"));

    temp.close().unwrap();
}

#[test]
fn test_login_force_ignores_cached_credential() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("cache.json").write_str(VALID_CACHE).unwrap();

    // Forcing re-authentication means the missing client id is fatal
    // even though the cache is valid.
    hermetic(&temp)
        .args(["login", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("AZURE_CLIENT_ID"));

    temp.close().unwrap();
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn test_respects_config_env() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("config.toml").write_str("[auth]\ntimeout_secs = 60\n").unwrap();

    onenote_mcp()
        .arg("tools")
        .env("ONENOTE_MCP_CONFIG", temp.child("config.toml").path())
        .assert()
        .success()
        .stdout(predicate::str::contains("onenote-read"));

    temp.close().unwrap();
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("config.toml").write_str("auth = \"not a table\"\n").unwrap();

    onenote_mcp()
        .arg("tools")
        .env("ONENOTE_MCP_CONFIG", temp.child("config.toml").path())
        .assert()
        .failure();

    temp.close().unwrap();
}

#[test]
fn test_local_config_file_is_picked_up() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".onenote-mcp.toml").write_str("[graph]\nbase_url = \"https://graph.microsoft.com/v1.0\"\n").unwrap();

    hermetic(&temp)
        .arg("serve")
        .write_stdin(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#.to_string() + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-11-05"));

    temp.close().unwrap();
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_invalid_subcommand() {
    onenote_mcp().arg("invalid-command-that-does-not-exist").assert().failure();
}

#[test]
fn test_invalid_flag() {
    onenote_mcp().arg("--invalid-flag-xyz").assert().failure();
}
