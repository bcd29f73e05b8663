//! Markets Adapter
//!
//! Thin read-only client for the aggregator's market and position endpoints.

mod client;
mod types;

pub use client::{MarketsClient, MarketsError};
pub use types::{Market, Position};
