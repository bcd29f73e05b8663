//! CLI Command Definitions
//!
//! Argument structures for all solblink subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solblink - Solana DeFi market browser and Blink action runner
#[derive(Parser, Debug)]
#[command(
    name = "solblink",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse Solana DeFi markets and execute Blink actions",
    long_about = "Solblink browses DeFi markets via an aggregator API and resolves, \
                  simulates and executes Blink transactions exposed by protocol \
                  action endpoints."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List DeFi markets from the aggregator
    Markets(MarketsCmd),

    /// Show a wallet's positions
    Positions(PositionsCmd),

    /// Describe a blink and list its actions
    Inspect(InspectCmd),

    /// Build a blink transaction and dry-run it
    Simulate(SimulateCmd),

    /// Build, sign and send a blink transaction
    Run(RunCmd),

    /// Health-check the configured RPC endpoints
    Health(HealthCmd),
}

/// List markets
#[derive(Parser, Debug)]
pub struct MarketsCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Only show markets for this protocol
    #[arg(short, long, value_name = "NAME")]
    pub protocol: Option<String>,
}

/// Show wallet positions
#[derive(Parser, Debug)]
pub struct PositionsCmd {
    /// Wallet address (base58)
    #[arg(value_name = "WALLET")]
    pub wallet: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Inspect a blink
#[derive(Parser, Debug)]
pub struct InspectCmd {
    /// Blink reference (https://... or blink:https://...)
    #[arg(value_name = "URL")]
    pub url: String,
}

/// Simulate a blink transaction
#[derive(Parser, Debug)]
pub struct SimulateCmd {
    /// Blink reference (https://... or blink:https://...)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Build-time parameter, repeatable (key=value)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Account to build for; defaults to the configured wallet's pubkey
    #[arg(long, value_name = "PUBKEY")]
    pub account: Option<String>,

    /// Override keypair path
    #[arg(long, value_name = "FILE")]
    pub keypair: Option<PathBuf>,
}

/// Execute a blink end-to-end
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Blink reference (https://... or blink:https://...)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Build-time parameter, repeatable (key=value)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    /// Override keypair path
    #[arg(long, value_name = "FILE")]
    pub keypair: Option<PathBuf>,

    /// Dry-run first and abort if the simulation fails
    #[arg(long)]
    pub simulate_first: bool,

    /// Send without prompting for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Health-check RPC endpoints
#[derive(Parser, Debug)]
pub struct HealthCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

/// Parse a `key=value` CLI parameter
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markets_with_protocol() {
        let args = vec!["solblink", "markets", "--protocol", "kamino"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Markets(cmd) => {
                assert_eq!(cmd.protocol.as_deref(), Some("kamino"));
                assert_eq!(cmd.config, PathBuf::from("config/default.toml"));
            }
            _ => panic!("Expected Markets command"),
        }
    }

    #[test]
    fn test_parse_positions() {
        let args = vec!["solblink", "positions", "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Positions(cmd) => {
                assert_eq!(cmd.wallet, "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
            }
            _ => panic!("Expected Positions command"),
        }
    }

    #[test]
    fn test_parse_inspect() {
        let args = vec!["solblink", "inspect", "blink:https://actions.example.com/vault"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Inspect(cmd) => {
                assert_eq!(cmd.url, "blink:https://actions.example.com/vault");
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_parse_simulate_with_params() {
        let args = vec![
            "solblink",
            "simulate",
            "https://actions.example.com/deposit",
            "--param",
            "amount=100",
            "--param",
            "token=USDC",
            "--account",
            "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Simulate(cmd) => {
                assert_eq!(
                    cmd.params,
                    vec![
                        ("amount".to_string(), "100".to_string()),
                        ("token".to_string(), "USDC".to_string())
                    ]
                );
                assert!(cmd.account.is_some());
                assert!(cmd.keypair.is_none());
            }
            _ => panic!("Expected Simulate command"),
        }
    }

    #[test]
    fn test_parse_run_with_flags() {
        let args = vec![
            "solblink",
            "run",
            "https://actions.example.com/deposit",
            "--simulate-first",
            "--yes",
            "--keypair",
            "/tmp/id.json",
        ];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Run(cmd) => {
                assert!(cmd.simulate_first);
                assert!(cmd.yes);
                assert_eq!(cmd.keypair, Some(PathBuf::from("/tmp/id.json")));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_defaults() {
        let args = vec!["solblink", "run", "https://actions.example.com/deposit"];
        let app = CliApp::try_parse_from(args).unwrap();

        match app.command {
            Command::Run(cmd) => {
                assert!(!cmd.simulate_first);
                assert!(!cmd.yes);
                assert!(cmd.params.is_empty());
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_health() {
        let args = vec!["solblink", "health"];
        let app = CliApp::try_parse_from(args).unwrap();
        assert!(matches!(app.command, Command::Health(_)));
    }

    #[test]
    fn test_global_flags() {
        let args = vec!["solblink", "-v", "--debug", "health"];
        let app = CliApp::try_parse_from(args).unwrap();

        assert!(app.verbose);
        assert!(app.debug);
    }

    #[test]
    fn test_param_parsing_rejects_missing_equals() {
        let args = vec![
            "solblink",
            "simulate",
            "https://actions.example.com/deposit",
            "--param",
            "amount100",
        ];
        assert!(CliApp::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("amount=100").unwrap(),
            ("amount".to_string(), "100".to_string())
        );
        // Values may contain '='
        assert_eq!(
            parse_key_val("memo=a=b").unwrap(),
            ("memo".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("=100").is_err());
        assert!(parse_key_val("plain").is_err());
    }
}
