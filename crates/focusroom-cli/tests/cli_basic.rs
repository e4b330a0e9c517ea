//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_focusroom"))
        .args(args)
        .env("FOCUSROOM_DATA_DIR", data_dir.path())
        .env_remove("FOCUSROOM_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_presets_list() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["presets"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Focus Time"));
    assert!(stdout.contains("Power Session"));
}

#[test]
fn test_presets_json() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["presets", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let presets = parsed.as_array().unwrap();
    assert_eq!(presets.len(), 4);
    assert_eq!(presets[0]["label"], "Focus Time");
    assert_eq!(presets[0]["minutes"], 25);
}

#[test]
fn test_history_starts_empty() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["history", "list", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_history_delete_unknown_id_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["history", "delete", "12345"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no session with id 12345"));
}

#[test]
fn test_history_stats() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["history", "stats"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["sessions"], 0);
    assert_eq!(parsed["minutes"], 0);
}

#[test]
fn test_run_rejects_empty_title() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["run", "--title", "", "--ephemeral", "--quiet"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("task title is empty"));
}

#[test]
fn test_run_rejects_unknown_preset() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(
        &dir,
        &["run", "--title", "Write", "--preset", "Nap", "--ephemeral", "--quiet"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown preset: 'Nap'"));
}

#[test]
fn test_calendar_link_for_planned_session() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(
        &dir,
        &["calendar", "--title", "Write report", "--preset", "Deep Work"],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
    assert!(stdout.contains("text=Write%20report%20%28Deep%20Work%29"));
}

#[test]
fn test_calendar_unknown_session() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run_cli(&dir, &["calendar", "42"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No session with id 42"));
}

#[test]
fn test_config_get_and_set() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run_cli(&dir, &["config", "get", "calendar.open_on_complete"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (code, _, _) = run_cli(&dir, &["config", "set", "calendar.open_on_complete", "false"]);
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(&dir, &["config", "get", "calendar.open_on_complete"]);
    assert_eq!(stdout.trim(), "false");
}

#[test]
fn test_config_set_custom_presets() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(
        &dir,
        &["config", "set", "presets", r#"[{"label":"Sprint","minutes":10}]"#],
    );
    assert_eq!(code, 0);

    let (_, stdout, _) = run_cli(&dir, &["presets"]);
    assert!(stdout.contains("Sprint"));
    assert!(!stdout.contains("Focus Time"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (code, _, _) = run_cli(&dir, &["config", "set", "cue.volume", "3"]);
    assert_ne!(code, 0);
}

#[test]
fn test_text_ids_that_look_numeric_can_be_used() {
    let dir = TempDir::new().unwrap();
    let db = focusroom_core::Database::open_at(dir.path().join("focusroom.db")).unwrap();
    db.kv_set(
        focusroom_core::storage::database::SESSIONS_KEY,
        r#"[{"id":"42","title":"Read","type":"Focus Time","duration":25,
             "completedAt":"2024-01-05T09:30:00Z","date":"1/5/2024"}]"#,
    )
    .unwrap();
    drop(db);

    let (code, stdout, _) = run_cli(&dir, &["calendar", "42"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("text=Read%20%28Focus%20Time%29"));

    let (code, stdout, _) = run_cli(&dir, &["history", "delete", "42"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("deleted 42"));

    let (_, stdout, _) = run_cli(&dir, &["history", "list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}
