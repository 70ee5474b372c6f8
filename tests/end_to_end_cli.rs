//! CLI Integration Tests
//!
//! Run the built binary and check exit codes, report output and the match
//! log it leaves behind.

mod common;

use common::*;
use std::process::{Command, Output};

fn sigscan(fixture: &ScanFixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sigscan"))
        .arg("--config-file")
        .arg(fixture.empty_config())
        .arg("--no-color")
        .args(args)
        .output()
        .expect("run sigscan")
}

fn full_args(fixture: &ScanFixture) -> Vec<String> {
    vec![
        "--base".to_string(),
        fixture.base().display().to_string(),
        "--log".to_string(),
        fixture.log().display().to_string(),
        "--path".to_string(),
        fixture.root().display().to_string(),
    ]
}

fn run_full(fixture: &ScanFixture, extra: &[&str]) -> Output {
    let owned = full_args(fixture);
    let mut args: Vec<&str> = owned.iter().map(String::as_str).collect();
    args.extend_from_slice(extra);
    sigscan(fixture, &args)
}

#[test]
fn test_successful_scan_prints_report() {
    let fixture = ScanFixture::new()
        .with_database(&[&format!("{};Trojan.Hello", MD5_HELLO)])
        .with_file("hello.txt", "hello")
        .with_file("other.txt", "other");

    let output = run_full(&fixture, &[]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Scan Report ==="));
    assert!(stdout.contains("Total files processed: 2"));
    assert!(stdout.contains("Malware files found: 1"));
    assert!(stdout.contains("Errors: 0"));
    assert!(stdout.contains("Time elapsed:"));
    assert_eq!(fixture.log_lines().len(), 1);
}

#[test]
fn test_json_report() {
    let fixture = ScanFixture::new()
        .with_database(&[&format!("{};Trojan.Hello", MD5_HELLO)])
        .with_file("hello.txt", "hello");

    let output = run_full(&fixture, &["--report-format", "json", "--threads", "2"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(value["total_files"], 1);
    assert_eq!(value["malware_files"], 1);
    assert_eq!(value["workers"], 1);
}

#[test]
fn test_missing_arguments_exit_with_usage() {
    let fixture = ScanFixture::new().with_database(&[]);

    let output = sigscan(&fixture, &["--base", &fixture.base().display().to_string()]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--log"));
    assert!(stderr.contains("--path"));
    assert!(stderr.contains("Usage"));
    assert!(!fixture.log().exists());
}

#[test]
fn test_zero_threads_is_usage_error() {
    let fixture = ScanFixture::new().with_database(&[]);
    let output = run_full(&fixture, &["--threads", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unreadable_database_exits_with_failure() {
    let fixture = ScanFixture::new().with_file("a.txt", "hello");

    let output = run_full(&fixture, &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("base.csv"));
}

#[test]
fn test_unopenable_log_exits_with_failure() {
    let fixture = ScanFixture::new()
        .with_database(&[&format!("{};Trojan.Hello", MD5_HELLO)])
        .with_file("a.txt", "hello");
    let bad_log = fixture.path().join("missing-dir").join("matches.log");

    let output = sigscan(
        &fixture,
        &[
            "--base",
            &fixture.base().display().to_string(),
            "--log",
            &bad_log.display().to_string(),
            "--path",
            &fixture.root().display().to_string(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_inputs_from_config_file() {
    let fixture = ScanFixture::new()
        .with_database(&[&format!("{};Trojan.Hello", MD5_HELLO)])
        .with_file("hello.txt", "hello");
    let config = fixture.path().join("sigscan.toml");
    std::fs::write(
        &config,
        format!(
            "base = {:?}\nlog = {:?}\npath = {:?}\nreport-format = \"json\"\n",
            fixture.base().display().to_string(),
            fixture.log().display().to_string(),
            fixture.root().display().to_string(),
        ),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sigscan"))
        .arg("--config-file")
        .arg(&config)
        .output()
        .expect("run sigscan");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(value["malware_files"], 1);
}

#[test]
fn test_invalid_log_level_in_config_is_usage_error() {
    let fixture = ScanFixture::new()
        .with_database(&[&format!("{};Trojan.Hello", MD5_HELLO)])
        .with_file("hello.txt", "hello");
    let config = fixture.path().join("sigscan.toml");
    std::fs::write(&config, "log-level = \"verbose\"\n").unwrap();

    let owned = full_args(&fixture);
    let output = Command::new(env!("CARGO_BIN_EXE_sigscan"))
        .arg("--config-file")
        .arg(&config)
        .args(&owned)
        .output()
        .expect("run sigscan");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("verbose"));
    assert!(!fixture.log().exists());
}

#[test]
fn test_missing_config_file_is_usage_error() {
    let fixture = ScanFixture::new();
    let output = Command::new(env!("CARGO_BIN_EXE_sigscan"))
        .arg("--config-file")
        .arg(fixture.path().join("absent.toml"))
        .output()
        .expect("run sigscan");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_version_flag() {
    let fixture = ScanFixture::new();
    let output = sigscan(&fixture, &["--version"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}
