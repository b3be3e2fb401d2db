//! Exit codes and output of the `kvconform` binary.

#![allow(clippy::unwrap_used)]

use std::net::TcpListener;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;

fn kvconform(args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kvconform"))
        .args(args)
        .env_clear()
        .envs(env.iter().copied())
        .output()
        .unwrap()
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[test]
fn list_prints_reference_suite_as_json_without_configuration() {
    let output = kvconform(&["list", "--json"], &[]);
    assert_eq!(output.status.code(), Some(0));

    let rows: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 11);
    assert_eq!(rows[0]["name"], "post_key_value_pair");
    assert_eq!(rows[9]["method"], "GET");
}

#[test]
fn list_honours_tag_filter() {
    let output = kvconform(&["list", "--tag", "bug"], &[]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 5);
    assert!(stdout.contains("post_percent_encoded_key"));
}

#[test]
fn check_config_without_settings_is_a_startup_error() {
    let output = kvconform(&["check-config"], &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid configuration"));
}

#[test]
fn check_config_redacts_secrets() {
    let output = kvconform(
        &["check-config"],
        &[
            ("QA_DEBUGGING_URL", "http://localhost:8080"),
            ("API_TOKEN", "very-secret-token"),
            ("REDIS_HOST", "localhost"),
            ("REDIS_PORT", "6379"),
            ("REDIS_PASSWORD", "very-secret-password"),
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("keys endpoint: http://localhost:8080/keys"));
    assert!(!stdout.contains("very-secret-token"));
    assert!(!stdout.contains("very-secret-password"));
}

#[test]
fn run_with_unreachable_store_is_a_startup_error() {
    let port = closed_port().to_string();
    let output = kvconform(
        &["run"],
        &[
            ("KVCONFORM_BASE_URL", "http://127.0.0.1:9"),
            ("KVCONFORM_API_TOKEN", "secret"),
            ("KVCONFORM_STORE__HOST", "127.0.0.1"),
            ("KVCONFORM_STORE__PORT", port.as_str()),
            ("KVCONFORM_STORE__TLS", "disabled"),
        ],
    );
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to connect to store"));
}

#[test]
fn list_with_unreadable_config_file_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    let output = kvconform(&["list", "--config", missing.to_str().unwrap()], &[]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to read configuration"));
}

#[test]
fn list_accepts_a_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("harness.toml");
    std::fs::write(&path, "timing_threshold_ms = 1500\n").unwrap();

    let output = kvconform(&["list", "--json", "--config", path.to_str().unwrap()], &[]);
    assert_eq!(output.status.code(), Some(0));
    let rows: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 11);
}

#[test]
fn run_selecting_no_cases_fails_before_connecting() {
    let port = closed_port().to_string();
    let output = kvconform(
        &["run", "--tag", "no-such-tag"],
        &[
            ("KVCONFORM_BASE_URL", "http://127.0.0.1:9"),
            ("KVCONFORM_API_TOKEN", "secret"),
            ("KVCONFORM_STORE__HOST", "127.0.0.1"),
            ("KVCONFORM_STORE__PORT", port.as_str()),
            ("KVCONFORM_STORE__TLS", "disabled"),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("No cases match the selection"));
}
