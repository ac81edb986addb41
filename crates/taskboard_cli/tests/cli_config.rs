use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

fn run_with_config(config_path: &Path, args: &[&str], input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let mut child = Command::new(exe)
        .args(args)
        .env("TASKBOARD_CONFIG_PATH", config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn shell");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    child.wait_with_output().expect("failed to read shell output")
}

#[test]
fn config_file_controls_sample_data_and_aliases() {
    let config_path = temp_path("config-aliases.json");
    let content = serde_json::json!({
        "sample_data": false,
        "aliases": { "a": "add", "done": "filter completed" },
        "default_priority": "high"
    });
    std::fs::write(&config_path, content.to_string()).unwrap();

    let output = run_with_config(&config_path, &[], "a \"Buy milk\"\nshow 1\ndone\nexit\n");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Learn the borrow checker"));
    assert!(stdout.contains("Added task: Buy milk (#1)"));
    assert!(stdout.contains("Priority:    high"));
    assert!(stdout.contains("0 of 1 shown | filter: completed"));
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let config_path = temp_path("config-invalid.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    let output = run_with_config(&config_path, &[], "exit\n");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARNING: invalid_data"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Learn the borrow checker"));
}

#[test]
fn overrides_win_over_config_file() {
    let config_path = temp_path("config-override.json");
    std::fs::write(&config_path, r#"{ "sample_data": true }"#).unwrap();

    let output = run_with_config(
        &config_path,
        &["--config-override", "sample_data=false", "--config-override", "priority=low"],
        "add Laundry\nshow 1\nexit\n",
    );
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Learn the borrow checker"));
    assert!(stdout.contains("Priority:    low"));
}

#[test]
fn bad_override_is_rejected() {
    let config_path = temp_path("config-bad-override.json");

    let output = run_with_config(&config_path, &["--config-override", "colour=blue"], "exit\n");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown config field 'colour'"));
}
