//! Configuration Module
//!
//! TOML-based configuration with environment variable overrides.

pub mod loader;

pub use loader::{load_config, Config, ConfigError};
