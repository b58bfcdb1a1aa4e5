//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary data directory.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tinywins"))
        .args(args)
        .env("TINYWINS_DATA_DIR", dir.path())
        .env_remove("TINYWINS_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &TempDir, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is not JSON")
}

fn create_habit(dir: &TempDir) -> String {
    let habit = run_json(
        dir,
        &[
            "habit",
            "create",
            "--identity",
            "reader",
            "--title",
            "Read 1 page",
            "--original-title",
            "Read 30 pages",
        ],
    );
    habit["id"].as_str().unwrap().to_string()
}

#[test]
fn test_identity_list() {
    let dir = TempDir::new().unwrap();
    let identities = run_json(&dir, &["identity", "list"]);
    assert_eq!(identities.as_array().unwrap().len(), 10);
    assert_eq!(identities[0]["id"], "reader");
}

#[test]
fn test_identity_select_and_show() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["identity", "select", "runner"]);
    let shown = run_json(&dir, &["identity", "show"]);
    assert_eq!(shown["selectedIdentity"]["id"], "runner");
}

#[test]
fn test_identity_select_unknown_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["identity", "select", "astronaut"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown identity"));
}

#[test]
fn test_habit_create_and_list() {
    let dir = TempDir::new().unwrap();
    let id = create_habit(&dir);
    assert!(id.starts_with("habit_"));

    let habits = run_json(&dir, &["habit", "list"]);
    assert_eq!(habits.as_array().unwrap().len(), 1);
    assert_eq!(habits[0]["originalTitle"], "Read 30 pages");
}

#[test]
fn test_habit_deactivate_hides_from_default_list() {
    let dir = TempDir::new().unwrap();
    let id = create_habit(&dir);
    let (_, _, code) = run_cli(&dir, &["habit", "deactivate", &id]);
    assert_eq!(code, 0);

    assert!(run_json(&dir, &["habit", "list"]).as_array().unwrap().is_empty());
    assert_eq!(run_json(&dir, &["habit", "list", "--all"]).as_array().unwrap().len(), 1);
}

#[test]
fn test_complete_once_per_day() {
    let dir = TempDir::new().unwrap();
    run_json(&dir, &["identity", "select", "reader"]);
    let id = create_habit(&dir);

    let first = run_json(&dir, &["checkin", "complete", &id]);
    assert_eq!(first["recorded"], true);
    assert_eq!(first["streak"], 1);
    assert!(first["celebration"].is_string());

    let second = run_json(&dir, &["checkin", "complete", &id]);
    assert_eq!(second["recorded"], false);
    assert_eq!(second["totalShowUps"], 1);

    let today = run_json(&dir, &["checkin", "today"]);
    assert_eq!(today.as_array().unwrap().len(), 1);

    let summary = run_json(&dir, &["stats", "summary"]);
    assert_eq!(summary["totalShowUps"], 1);
}

#[test]
fn test_pause_and_resume() {
    let dir = TempDir::new().unwrap();
    let paused = run_json(&dir, &["recovery", "pause", "5"]);
    assert_eq!(paused["recoveryState"], "paused");
    assert_eq!(paused["daysUntilRecovery"], 5);

    let resumed = run_json(&dir, &["recovery", "resume"]);
    assert_eq!(resumed["recoveryState"], "active");
    assert_eq!(resumed["daysUntilRecovery"], 0);
}

#[test]
fn test_pause_rejects_out_of_range_days() {
    let dir = TempDir::new().unwrap();
    for days in ["0", "200000000"] {
        let (_, _, code) = run_cli(&dir, &["recovery", "pause", days]);
        assert_ne!(code, 0, "pause {days} should be rejected");
    }
    let status = run_json(&dir, &["recovery", "status"]);
    assert_eq!(status["recoveryState"], "active");
}

#[test]
fn test_config_seed_can_be_cleared() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["config", "set", "celebration.seed", "42"]);
    assert_eq!(code, 0);
    let (_, stderr, code) = run_cli(&dir, &["config", "set", "celebration.seed", "none"]);
    assert_eq!(code, 0, "{stderr}");
    let (stdout, _, _) = run_cli(&dir, &["config", "get", "celebration.seed"]);
    assert_eq!(stdout.trim(), "null");
}

#[test]
fn test_whimsy_set_persists() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["whimsy", "set", "maximum"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&dir, &["whimsy", "get"]);
    assert_eq!(stdout.trim(), "maximum");

    let (_, stderr, code) = run_cli(&dir, &["whimsy", "set", "extreme"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown whimsy level"));
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&dir, &["config", "get", "store.backend"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "sqlite");

    let (_, _, code) = run_cli(&dir, &["config", "set", "store.backend", "json"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&dir, &["config", "get", "store.backend"]);
    assert_eq!(stdout.trim(), "json");

    let (_, _, code) = run_cli(&dir, &["config", "set", "store.backend", "floppy"]);
    assert_eq!(code, 1);
}

#[test]
fn test_message_encourage() {
    let dir = TempDir::new().unwrap();
    let message = run_json(&dir, &["message", "encourage"]);
    assert!(message["text"].is_string());
}
