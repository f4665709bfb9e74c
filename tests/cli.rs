//! Integration tests for the seoscope CLI
//!
//! These run the built binary as a subprocess and never touch the network.

use std::process::Command;

fn seoscope() -> Command {
    Command::new(env!("CARGO_BIN_EXE_seoscope"))
}

#[test]
fn test_cli_help() {
    let output = seoscope().arg("--help").output().expect("Failed to run CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(output.status.success());
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("--json"));
    assert!(stdout.contains("--no-image-probe"));
}

#[test]
fn test_cli_version() {
    let output = seoscope().arg("--version").output().expect("Failed to run CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(concat!("seoscope ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_cli_rejects_unsupported_scheme() {
    let output = seoscope()
        .arg("ftp://example.com/file")
        .output()
        .expect("Failed to run CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unsupported URL scheme"));
}

#[test]
fn test_cli_rejects_invalid_url() {
    let output = seoscope()
        .arg("not a url")
        .output()
        .expect("Failed to run CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid URL"));
}

#[test]
fn test_cli_requires_url() {
    let output = seoscope().output().expect("Failed to run CLI");

    assert!(!output.status.success());
}
