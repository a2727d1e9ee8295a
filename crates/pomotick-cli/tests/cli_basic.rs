//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a throwaway HOME so config and the
//! session database never touch the real user directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomotick"))
        .args(args)
        .env("HOME", home)
        .env_remove("POMOTICK_ENV")
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("CLI did not exit");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_status_is_json_snapshot() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["status"], None);
    assert_eq!(code, 0, "status failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["time_text"], "25:00");
    assert_eq!(json["phase"], "session");
    assert_eq!(json["running"], false);
    assert_eq!(json["completed"], 0);
}

#[test]
fn test_stats_reports_goal() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["stats"], None);
    assert_eq!(code, 0, "stats failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["completed"], 0);
    assert_eq!(json["goal"], 4);
    assert_eq!(json["goal_complete"], false);
}

#[test]
fn test_config_set_then_get() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "timer.session_minutes", "50"], None);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.session_minutes"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    let (stdout, _, _) = run_cli(home.path(), &["status"], None);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["time_text"], "50:00");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timer.nope", "1"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_config_reset() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["config", "set", "timer.goal", "9"], None);
    let (stdout, _, code) = run_cli(home.path(), &["config", "reset"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("config reset to defaults"));
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timer.goal"], None);
    assert_eq!(stdout.trim(), "4");
}

#[test]
fn test_run_accepts_commands_and_quits() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["run", "--session", "3"],
        Some("s+\nbogus\nt\nt\nq\n"),
    );
    assert_eq!(code, 0, "run failed: {stderr}");
    assert!(stdout.contains("04:00"));
    assert!(stdout.contains("Session started!"));
    assert!(stdout.contains("Timer paused"));
    assert!(stdout.contains("Completed sessions: 0"));
    assert!(stderr.contains("unknown command: 'bogus'"));
}

#[test]
fn test_run_exits_on_eof() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["run"], Some(""));
    assert_eq!(code, 0);
}

#[test]
fn test_completions() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["completions", "bash"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("pomotick"));
}
