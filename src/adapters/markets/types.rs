//! Aggregator API response types.

use serde::{Deserialize, Serialize};

/// One DeFi market as reported by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub id: String,
    pub protocol: String,
    pub name: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub tvl_usd: Option<f64>,
    #[serde(default)]
    pub apy_pct: Option<f64>,
}

/// One wallet position in a market
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub market_id: String,
    pub protocol: String,
    #[serde(default)]
    pub token: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub value_usd: Option<f64>,
}
