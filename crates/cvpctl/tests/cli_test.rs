//! Integration tests for the `cvpctl` binary.
//!
//! Validate argument parsing, help output, and configuration error
//! handling without a live controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `cvpctl` binary with env isolation.
///
/// Clears credential env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn cvpctl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cvpctl").unwrap();
    cmd.env("HOME", "/tmp/cvpctl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/cvpctl-test-nonexistent")
        .env_remove("CVP")
        .env_remove("CVPTOKEN")
        .env_remove("CVPCTL_PROFILE");
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
    let output = cvpctl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    cvpctl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("CloudVision")
            .and(predicate::str::contains("inventory"))
            .and(predicate::str::contains("events"))
            .and(predicate::str::contains("connectivity"))
            .and(predicate::str::contains("tag")),
    );
}

#[test]
fn test_version_flag() {
    cvpctl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cvpctl"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_host_is_a_usage_error() {
    let output = cvpctl_cmd().arg("inventory").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("CVP"),
        "expected a hint naming the CVP env var:\n{text}"
    );
}

#[test]
fn test_missing_token_is_a_usage_error() {
    let output = cvpctl_cmd()
        .args(["inventory", "--host", "cvp.example.com"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("CVPTOKEN"),
        "expected a hint naming the CVPTOKEN env var:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_rejected() {
    let output = cvpctl_cmd()
        .args(["inventory", "--profile", "does-not-exist"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("does-not-exist"), "output:\n{text}");
}

// ── Tag subcommand parsing ──────────────────────────────────────────

#[test]
fn test_tag_create_requires_label_and_value() {
    cvpctl_cmd()
        .args(["tag", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_tag_create_rejects_bad_element_type() {
    cvpctl_cmd()
        .args([
            "tag", "create", "env", "prod", "--element-type", "vlan",
            "--host", "cvp.example.com", "--token", "t",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("element-type"));
}
