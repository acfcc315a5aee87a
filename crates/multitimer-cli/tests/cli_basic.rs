//! Basic CLI E2E tests.
//!
//! Each test runs the built binary with HOME pointed at a fresh temp dir so the
//! user's real configuration is never touched.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &TempDir, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_multitimer"))
        .args(args)
        .env("HOME", home.path())
        .env("TZ", "UTC")
        .env_remove("MULTITIMER_ENV")
        .env_remove("MULTITIMER_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

#[test]
fn test_config_get_default() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&home, &["config", "get", "timer.default_title"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "timer");
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["config", "set", "timer.default_amount", "25"], None);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(&home, &["config", "get", "timer.default_amount"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_rejects_bad_tick_interval() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["config", "set", "timer.tick_interval_ms", "5"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_unknown_key() {
    let home = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&home, &["config", "get", "timer.nope"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_list_and_reset() {
    let home = TempDir::new().unwrap();
    run_cli(&home, &["config", "set", "display.show_progress", "false"], None);
    let (code, stdout, _) = run_cli(&home, &["config", "list"], None);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["display"]["show_progress"], false);

    let (code, _, _) = run_cli(&home, &["config", "reset"], None);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(&home, &["config", "get", "display.show_progress"], None);
    assert_eq!(stdout.trim(), "true");
}

#[test]
fn test_countdown_completes_once() {
    let home = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        &home,
        &["countdown", "--in", "1s", "--title", "tea", "--tick-ms", "20", "--no-notify", "--json"],
        None,
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert_eq!(events[0]["type"], "TimerCreated");
    let completions: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "TimerCompleted")
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0]["title"], "tea");
}

#[test]
fn test_countdown_past_time_is_rejected() {
    let home = TempDir::new().unwrap();
    // Midnight today has always passed.
    let (code, _, stderr) = run_cli(&home, &["countdown", "--at", "00:00", "--no-notify"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("choose a time later than now"));
}

#[test]
fn test_countdown_rejects_both_modes() {
    let home = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&home, &["countdown", "--in", "5m", "--at", "23:59"], None);
    assert_ne!(code, 0);
}

#[test]
fn test_session_runs_piped_timers_to_completion() {
    let home = TempDir::new().unwrap();
    let input = "add --title \"green tea\" --in 1s\nadd --title soup\nstart 1\n";
    let (code, stdout, _) = run_cli(
        &home,
        &["session", "--tick-ms", "20", "--no-notify", "--json"],
        Some(input),
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    let created = events.iter().filter(|e| e["type"] == "TimerCreated").count();
    assert_eq!(created, 2);
    let completed: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "TimerCompleted")
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "green tea");
}

#[test]
fn test_session_reports_errors_and_continues() {
    let home = TempDir::new().unwrap();
    let input = "start 3\nadd\nlist\n";
    let (code, stdout, stderr) = run_cli(&home, &["session", "--no-notify"], Some(input));
    assert_eq!(code, 0);
    assert!(stderr.contains("error:"));
    assert!(stdout.contains("added"));
    assert!(stdout.contains("idle"));
}

#[test]
fn test_session_quit() {
    let home = TempDir::new().unwrap();
    let input = "add --in 1h\nstart 1\nquit\n";
    let (code, stdout, _) = run_cli(&home, &["session", "--no-notify"], Some(input));
    assert_eq!(code, 0);
    assert!(stdout.contains("started"));
    assert!(!stdout.contains("alert!"));
}

#[test]
fn test_session_json_list_emits_typed_snapshots() {
    let home = TempDir::new().unwrap();
    let input = "add --title tea --in 3m\nadd --at 23:59\nlist\n";
    let (code, stdout, _) = run_cli(&home, &["session", "--no-notify", "--json"], Some(input));
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert!(events.iter().all(|e| e["type"].is_string()));
    let snapshots: Vec<_> = events
        .iter()
        .filter(|e| e["type"] == "StateSnapshot")
        .collect();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0]["title"], "tea");
    assert_eq!(snapshots[0]["phase"], "idle");
    assert_eq!(snapshots[0]["target_summary"], "in 3m");
    assert_eq!(snapshots[1]["target_summary"], "at 23:59");
}
