//! Integration tests for the `md` binary
//!
//! These run the real process end to end with small, fast configurations.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("md.yml");
    fs::write(&path, body).expect("Failed to write config");
    path
}

fn md(dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("md").expect("md binary not built");
    cmd.arg("--config")
        .arg(config)
        .arg("--log-file")
        .arg(dir.join("logs").join("md.log"))
        .timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn test_run_prints_progress_and_exits_zero() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        "coordinator:\n  workers: 2\n  launch-delay-ms: 10\nworker:\n  iterations: 3\n  pause-min-ms: 1\n  pause-max-ms: 3\n",
    );

    md(temp_dir.path(), &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Main thread:"))
        .stdout(predicate::str::contains("Launching 2 threads:"))
        .stdout(predicate::str::contains("Logic thread 1 created as"))
        .stdout(predicate::str::contains("Signal emitted from"))
        .stdout(predicate::str::contains("Signal received by"))
        .stdout(predicate::str::contains("Thread 1: finished."))
        .stdout(predicate::str::contains("Thread 2: finished."));
}

#[test]
fn test_default_shape_completes_within_bound() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // Default topology (4 x 10, 2-20ms pauses), short launch delay
    let config = write_config(temp_dir.path(), "coordinator:\n  launch-delay-ms: 50\n");

    let start = Instant::now();
    let output = md(temp_dir.path(), &config).output().expect("Failed to run md");
    let elapsed = start.elapsed();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Signal received by").count(), 40);
    assert_eq!(stdout.matches(": finished.").count(), 4);

    // 50ms launch + 4 x 10 x 20ms worst case, plus process start-up slack
    assert!(elapsed < Duration::from_millis(50 + 800) + Duration::from_secs(10));
}

#[test]
fn test_echo_disabled_prints_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        "coordinator:\n  workers: 1\n  launch-delay-ms: 0\n  echo: false\nworker:\n  iterations: 2\n  pause-max-ms: 2\n",
    );

    md(temp_dir.path(), &config).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_writes_log_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        "log-level: DEBUG\ncoordinator:\n  workers: 1\n  launch-delay-ms: 0\n  echo: false\nworker:\n  iterations: 2\n  pause-max-ms: 2\n",
    );

    md(temp_dir.path(), &config).assert().success();

    let log = fs::read_to_string(temp_dir.path().join("logs").join("md.log")).expect("log file missing");
    assert!(log.contains("Coordinator started"));
    assert!(log.contains("All workers finished"));
}

#[test]
fn test_invalid_config_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "worker:\n  iterations: 0\n");

    md(temp_dir.path(), &config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("missing.yml");

    md(temp_dir.path(), &missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
