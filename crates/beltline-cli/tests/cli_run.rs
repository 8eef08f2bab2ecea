//! CLI integration tests for the `beltline` binary.

use std::process::Command;

fn scenario(name: &str) -> String {
    format!("{}/scenarios/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn default_run_prints_report() {
    let bin = env!("CARGO_BIN_EXE_beltline");
    let output = Command::new(bin)
        .args(["--seed", "3"])
        .env_remove("BELTLINE_CONFIG")
        .output()
        .expect("failed to run beltline");

    assert!(
        output.status.success(),
        "beltline exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Processed items over 100 steps:"));

    let total: u64 = lines
        .map(|line| {
            line.rsplit("Count: ")
                .next()
                .and_then(|n| n.trim().parse::<u64>().ok())
                .expect("malformed report line")
        })
        .sum();
    assert_eq!(total, 100);
}

#[test]
fn same_seed_same_output() {
    let bin = env!("CARGO_BIN_EXE_beltline");
    let run = || {
        Command::new(bin)
            .args(["--config", &scenario("reference.toml"), "--steps", "250"])
            .env_remove("BELTLINE_CONFIG")
            .output()
            .expect("failed to run beltline")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn json_output_parses_shape() {
    let bin = env!("CARGO_BIN_EXE_beltline");
    let output = Command::new(bin)
        .args(["--config", &scenario("long_belt.ron"), "--steps", "50", "--json"])
        .env_remove("BELTLINE_CONFIG")
        .output()
        .expect("failed to run beltline");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"steps\": 50"));
    assert!(stdout.contains("\"entries\""));
    assert!(stdout.contains("\"raw_lost\""));
}

#[test]
fn invalid_config_fails() {
    let bin = env!("CARGO_BIN_EXE_beltline");
    let output = Command::new(bin)
        .args(["--belt-length", "0"])
        .env_remove("BELTLINE_CONFIG")
        .output()
        .expect("failed to run beltline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid factory configuration"));
}
