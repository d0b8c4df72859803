//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "fot-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("FlightOnTime"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("info"), "Should show info command");
    assert!(stdout.contains("health"), "Should show health command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "fot-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("fot"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "fot-cli", "--", "predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "predict help should succeed");
    assert!(stdout.contains("--carrier"), "Should show carrier flag");
    assert!(stdout.contains("--departure"), "Should show departure flag");
    assert!(
        stdout.contains("--distance-km"),
        "Should show distance flag"
    );
}

/// Test that predict requires its flags
#[test]
fn test_predict_requires_flags() {
    let output = Command::new("cargo")
        .args(["run", "-p", "fot-cli", "--", "predict"])
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "predict without flags should fail"
    );
}
