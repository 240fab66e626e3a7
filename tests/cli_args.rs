//! Integration tests for CLI argument handling
//!
//! Runs the built binary. Requests go to a closed local port so the fetchers
//! exercise their fallback path without touching the network.

use std::process::Command;

/// Base URL nothing listens on
const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9/api/v3";

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_coinfront"))
        .args(args)
        .env_remove("COINGECKO_BASE_URL")
        .env_remove("COINGECKO_API_KEY")
        .output()
        .expect("Failed to execute coinfront")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("coinfront"), "Help should mention coinfront");
    assert!(stdout.contains("markets"), "Help should mention markets");
    assert!(stdout.contains("history"), "Help should mention history");
    assert!(stdout.contains("summary"), "Help should mention summary");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_page_zero_prints_error_and_exits() {
    let output = run_cli(&["markets", "--page", "0"]);
    assert!(!output.status.success(), "Expected page 0 to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("error"),
        "Should print error message about the page: {}",
        stderr
    );
}

#[test]
fn test_markets_unreachable_upstream_prints_mock_listings() {
    let output = run_cli(&["--base-url", UNREACHABLE_BASE_URL, "markets"]);
    assert!(
        output.status.success(),
        "Unreachable upstream should degrade, not fail: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let listings: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let ids: Vec<&str> = listings
        .as_array()
        .expect("Expected an array")
        .iter()
        .filter_map(|l| l["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["bitcoin", "ethereum", "tether"]);
}

#[test]
fn test_history_unreachable_upstream_prints_mock_series() {
    let output = run_cli(&[
        "--base-url",
        UNREACHABLE_BASE_URL,
        "history",
        "bitcoin",
        "--from",
        "1700000000",
        "--to",
        "1700600000",
    ]);
    assert!(output.status.success());

    let points: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    let points = points.as_array().expect("Expected an array");
    assert_eq!(points.len(), 30);
    assert_eq!(points[0]["price"].as_f64(), Some(50100.0));
    assert_eq!(points[29]["price"].as_f64(), Some(53000.0));
}

#[test]
fn test_summary_unreachable_upstream_uses_mock_snapshot() {
    let output = run_cli(&["--base-url", UNREACHABLE_BASE_URL, "summary"]);
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["top_gainer"]["id"], "bitcoin");
    assert_eq!(summary["top_loser"]["id"], "tether");
    assert_eq!(summary["top_market_cap"].as_array().map(Vec::len), Some(3));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use coinfront::cli::{Cli, Command, Config};

    #[test]
    fn test_cli_markets_per_page_flag() {
        let cli = Cli::parse_from(["coinfront", "markets", "--per-page", "25"]);
        match cli.command {
            Command::Markets { per_page, page, .. } => {
                assert_eq!(per_page, 25);
                assert_eq!(page, 1);
            }
            other => panic!("Expected markets command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_summary_defaults() {
        let cli = Cli::parse_from(["coinfront", "summary"]);
        assert_eq!(
            cli.command,
            Command::Summary {
                currency: "usd".to_string(),
                per_page: 100,
            }
        );
    }

    #[test]
    fn test_config_carries_api_key() {
        let cli = Cli::parse_from(["coinfront", "--api-key", "k", "markets"]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.api_key, "k");
    }
}
