//! Integration tests for the `prusalink` CLI binary.
//!
//! These validate argument parsing, help output, and configuration
//! errors — all without requiring a live printer.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `prusalink` binary with env isolation.
///
/// Clears all `PRUSALINK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn prusalink_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("prusalink");
    cmd.env("HOME", "/tmp/prusalink-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/prusalink-cli-test-nonexistent")
        .env_remove("PRUSALINK_PRINTER")
        .env_remove("PRUSALINK_HOST")
        .env_remove("PRUSALINK_API_KEY")
        .env_remove("PRUSALINK_USERNAME")
        .env_remove("PRUSALINK_PASSWORD")
        .env_remove("PRUSALINK_TIMEOUT");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = prusalink_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    prusalink_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("PrusaLink")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("watch")),
    );
}

#[test]
fn test_subcommand_help() {
    prusalink_cmd()
        .args(["status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_unknown_subcommand_fails() {
    prusalink_cmd()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_status_without_config_reports_no_printer() {
    let output = prusalink_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "usage error expected");
    let text = combined_output(&output);
    assert!(
        text.contains("No printer configured"),
        "Expected config hint in output:\n{text}"
    );
}

#[test]
fn test_host_without_credentials_is_a_usage_error() {
    let output = prusalink_cmd()
        .args(["status", "--host", "http://192.168.1.50"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("--api-key") || text.contains("credentials"),
        "Expected credential hint in output:\n{text}"
    );
}
