//! Solana Actions Wire Types
//!
//! Request and response structures for the two-phase blink exchange:
//! GET describes an action, POST builds the unsigned transaction.

use serde::{Deserialize, Serialize};
use url::Url;

/// Scheme prefix accepted in front of an ordinary https action URL.
pub const BLINK_SCHEME_PREFIX: &str = "blink:";

/// An action reference: the endpoint URL plus query parameters applied at
/// build time. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct BlinkAction {
    pub url: Url,
    pub params: Vec<(String, String)>,
}

impl BlinkAction {
    /// Accepts `https://...` or the `blink:https://...` form; the prefix is
    /// stripped before any network call.
    pub fn parse(reference: &str) -> Result<Self, url::ParseError> {
        let raw = reference
            .strip_prefix(BLINK_SCHEME_PREFIX)
            .unwrap_or(reference);
        Ok(Self {
            url: Url::parse(raw)?,
            params: Vec::new(),
        })
    }

    /// Attach build-time parameters.
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }
}

/// Metadata returned by the GET (describe) phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: Option<ActionLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLinks {
    #[serde(default)]
    pub actions: Vec<LinkedAction>,
}

/// One action linked from a metadata document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedAction {
    pub label: String,
    /// Absolute, or relative to the describing URL's origin
    pub href: String,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// One executable action surfaced by inspect, with its href fully resolved
#[derive(Debug, Clone)]
pub struct ActionDisplay {
    pub label: String,
    pub href: Url,
    pub parameters: Vec<ActionParameter>,
}

/// Artifact returned by the POST (build) phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkTransaction {
    /// Base64-encoded unsigned transaction, consumed once per execution
    /// attempt
    pub transaction: String,
    /// Optional human-readable note from the action server
    #[serde(default)]
    pub message: Option<String>,
}
