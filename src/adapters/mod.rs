//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits and the thin
//! clients the CLI consumes:
//! - Blink: Solana Actions protocol client (describe/build/inspect)
//! - Solana: RPC endpoint pool, client wrapper and wallet management
//! - Markets: read-only aggregator API client
//! - CLI: command-line interface definitions

pub mod blink;
pub mod cli;
pub mod markets;
pub mod solana;

pub use blink::{BlinkAction, BlinkClient, BlinkTransaction};
pub use cli::CliApp;
pub use markets::MarketsClient;
pub use solana::{RpcPool, SolanaClient, WalletManager};
