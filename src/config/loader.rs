//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching the
//! config/default.toml structure. Secrets and endpoint overrides come from
//! the environment, never from the checked-in file.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solana: SolanaSection,
    #[serde(default)]
    pub aggregator: AggregatorSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct SolanaSection {
    /// Comma-separated RPC endpoints, rotated round-robin
    #[serde(default)]
    pub rpc_urls: Option<String>,
    /// Single RPC endpoint, used when no list is configured
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Commitment level: "processed", "confirmed", "finalized"
    #[serde(default = "default_commitment")]
    pub commitment: String,
    /// Wallet keypair path (NEVER commit this file!)
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

impl Default for SolanaSection {
    fn default() -> Self {
        Self {
            rpc_urls: None,
            rpc_url: None,
            commitment: default_commitment(),
            keypair_path: default_keypair_path(),
        }
    }
}

impl SolanaSection {
    /// Multi-value endpoint source.
    /// Checks SOLANA_RPC_URLS env var first, falls back to config value
    pub fn rpc_urls_source(&self) -> Option<String> {
        std::env::var("SOLANA_RPC_URLS")
            .ok()
            .or_else(|| self.rpc_urls.clone())
    }

    /// Single-value endpoint source.
    /// Checks SOLANA_RPC_URL env var first, falls back to config value
    pub fn rpc_url_source(&self) -> Option<String> {
        std::env::var("SOLANA_RPC_URL")
            .ok()
            .or_else(|| self.rpc_url.clone())
    }

    /// Get keypair path with environment variable override
    /// Checks SOLANA_KEYPAIR_PATH env var first, falls back to config value
    pub fn get_keypair_path(&self) -> String {
        std::env::var("SOLANA_KEYPAIR_PATH").unwrap_or_else(|_| self.keypair_path.clone())
    }
}

/// Aggregator API configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorSection {
    /// Base URL of the market/position aggregator API
    #[serde(default = "default_aggregator_url")]
    pub api_url: String,
    /// Optional API key for higher rate limits
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            api_url: default_aggregator_url(),
            api_key: None,
        }
    }
}

impl AggregatorSection {
    /// Get API key with environment variable fallback
    /// Checks AGGREGATOR_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("AGGREGATOR_API_KEY").ok()
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_keypair_path() -> String {
    "~/.config/solana/id.json".to_string()
}

fn default_aggregator_url() -> String {
    "https://api.solblink.dev/v1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Load from a file, or fall back to built-in defaults when the file is
    /// missing so read-only commands work without a config checkout.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        if path.as_ref().exists() {
            load_config(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.solana.commitment.as_str() {
            "processed" | "confirmed" | "finalized" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "commitment must be processed/confirmed/finalized, got {}",
                    other
                )));
            }
        }

        if self.solana.keypair_path.is_empty() {
            return Err(ConfigError::ValidationError(
                "keypair_path cannot be empty".to_string(),
            ));
        }

        if self.aggregator.api_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "api_url cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
