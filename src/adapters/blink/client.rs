//! Blink Action Client
//!
//! HTTP client for the Solana Actions protocol. A GET against an action URL
//! describes it; a POST with the wallet's account builds the unsigned
//! transaction to sign and send.

use std::time::Duration;

use reqwest::{header, Client};
use thiserror::Error;
use url::Url;

use super::types::{ActionDisplay, ActionMetadata, BlinkAction, BlinkTransaction};

/// Errors from the describe/build exchange
#[derive(Debug, Error)]
pub enum BlinkError {
    #[error("Invalid action URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx from the GET (describe) phase
    #[error("Metadata fetch failed: HTTP {status} {status_text}")]
    MetadataFetch { status: u16, status_text: String },

    /// Non-2xx from the POST (build) phase
    #[error("Transaction build failed: HTTP {status}: {body}")]
    TransactionBuild { status: u16, body: String },
}

/// Client for blink action endpoints
#[derive(Debug, Clone)]
pub struct BlinkClient {
    http: Client,
}

impl BlinkClient {
    pub fn new() -> Result<Self, BlinkError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { http })
    }

    /// GET phase: fetch the action's metadata.
    pub async fn describe(&self, url: &Url) -> Result<ActionMetadata, BlinkError> {
        tracing::debug!(url = %url, "describing action");
        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BlinkError::MetadataFetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// POST phase: build the unsigned transaction for `account`.
    ///
    /// Params are merged into the query string first; a param with the same
    /// name as an existing query key overwrites it.
    pub async fn build(
        &self,
        url: &Url,
        account: &str,
        params: &[(String, String)],
    ) -> Result<BlinkTransaction, BlinkError> {
        let target = merge_query_params(url, params);
        tracing::debug!(url = %target, account = %account, "building transaction");
        let response = self
            .http
            .post(target)
            .header(header::ACCEPT, "application/json")
            .json(&serde_json::json!({ "account": account }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) if !body.is_empty() => body,
                _ => "Unknown error".to_string(),
            };
            return Err(BlinkError::TransactionBuild {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Describe, then flatten the metadata into executable entries.
    pub async fn inspect(&self, action: &BlinkAction) -> Result<Vec<ActionDisplay>, BlinkError> {
        let metadata = self.describe(&action.url).await?;
        Ok(flatten_metadata(&metadata, &action.url)?)
    }
}

/// A metadata document without linked actions is itself the single action;
/// otherwise each linked href is resolved against the describing URL.
pub fn flatten_metadata(
    metadata: &ActionMetadata,
    base: &Url,
) -> Result<Vec<ActionDisplay>, url::ParseError> {
    let linked = metadata
        .links
        .as_ref()
        .map(|links| links.actions.as_slice())
        .unwrap_or(&[]);

    if linked.is_empty() {
        return Ok(vec![ActionDisplay {
            label: metadata.label.clone(),
            href: base.clone(),
            parameters: Vec::new(),
        }]);
    }

    linked
        .iter()
        .map(|entry| {
            Ok(ActionDisplay {
                label: entry.label.clone(),
                href: resolve_action_href(base, &entry.href)?,
                parameters: entry.parameters.clone(),
            })
        })
        .collect()
}

/// Root-relative hrefs resolve against the describing URL's origin,
/// dropping its path; absolute hrefs pass through unchanged.
pub fn resolve_action_href(base: &Url, href: &str) -> Result<Url, url::ParseError> {
    base.join(href)
}

/// Merge params into a URL's query string, overwriting same-named keys and
/// preserving the order of what remains.
pub fn merge_query_params(url: &Url, params: &[(String, String)]) -> Url {
    if params.is_empty() {
        return url.clone();
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(name, _)| name == key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut merged = url.clone();
    merged.set_query(None);
    {
        let mut pairs = merged.query_pairs_mut();
        for (key, value) in retained.iter().chain(params.iter()) {
            pairs.append_pair(key, value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::blink::types::{ActionLinks, LinkedAction};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_merge_appends_new_params() {
        let merged = merge_query_params(
            &url("https://host/path?x=1"),
            &[("amount".to_string(), "100".to_string())],
        );
        assert_eq!(merged.as_str(), "https://host/path?x=1&amount=100");
    }

    #[test]
    fn test_merge_overwrites_same_key() {
        let merged = merge_query_params(
            &url("https://host/path?amount=1&x=2"),
            &[("amount".to_string(), "100".to_string())],
        );
        assert_eq!(merged.as_str(), "https://host/path?x=2&amount=100");
    }

    #[test]
    fn test_merge_without_params_is_identity() {
        let original = url("https://host/path?x=1");
        assert_eq!(merge_query_params(&original, &[]), original);
    }

    #[test]
    fn test_resolve_root_relative_href() {
        let resolved = resolve_action_href(&url("https://x.com/bar"), "/foo").unwrap();
        assert_eq!(resolved.as_str(), "https://x.com/foo");
    }

    #[test]
    fn test_resolve_absolute_href_passes_through() {
        let resolved =
            resolve_action_href(&url("https://x.com/bar"), "https://other.com/act").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/act");
    }

    #[test]
    fn test_flatten_without_links_yields_single_action() {
        let metadata = ActionMetadata {
            label: "Deposit".to_string(),
            icon: None,
            description: None,
            links: None,
        };
        let base = url("https://x.com/deposit");

        let actions = flatten_metadata(&metadata, &base).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Deposit");
        assert_eq!(actions[0].href, base);
        assert!(actions[0].parameters.is_empty());
    }

    #[test]
    fn test_flatten_resolves_linked_hrefs() {
        let metadata = ActionMetadata {
            label: "Vault".to_string(),
            icon: None,
            description: None,
            links: Some(ActionLinks {
                actions: vec![
                    LinkedAction {
                        label: "Deposit 1".to_string(),
                        href: "/deposit?amount=1".to_string(),
                        parameters: vec![],
                    },
                    LinkedAction {
                        label: "External".to_string(),
                        href: "https://other.com/act".to_string(),
                        parameters: vec![],
                    },
                ],
            }),
        };

        let actions = flatten_metadata(&metadata, &url("https://x.com/bar")).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].href.as_str(), "https://x.com/deposit?amount=1");
        assert_eq!(actions[1].href.as_str(), "https://other.com/act");
    }
}
