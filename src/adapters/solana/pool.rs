//! RPC Endpoint Pool
//!
//! Holds the configured node endpoints and hands them out round-robin so a
//! single public endpoint is not a single point of failure. The pool is an
//! explicit service object owned by the command layer, never a module
//! global, so tests can scope one per run.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use futures::future::join_all;
use solana_sdk::commitment_config::CommitmentConfig;

use super::rpc::SolanaClient;

/// Public fallback when nothing is configured.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Resolve the endpoint list: comma-separated multi-value source first,
/// then a single-value source, then the built-in default. Never fails.
pub fn resolve_endpoints(multi: Option<String>, single: Option<String>) -> Vec<String> {
    if let Some(list) = multi {
        let urls: Vec<String> = list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !urls.is_empty() {
            return urls;
        }
    }
    if let Some(url) = single {
        let url = url.trim().to_string();
        if !url.is_empty() {
            return vec![url];
        }
    }
    vec![DEFAULT_RPC_URL.to_string()]
}

/// Outcome of probing one endpoint. Probe failures never propagate; they
/// fold into `healthy: false` with the error text.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub url: String,
    pub healthy: bool,
    pub slot: Option<u64>,
    pub version: Option<String>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// Round-robin pool over the configured RPC endpoints.
pub struct RpcPool {
    endpoints: Vec<String>,
    cursor: AtomicUsize,
    shared: Mutex<Option<SolanaClient>>,
    commitment: CommitmentConfig,
}

impl RpcPool {
    /// An empty list falls back to the public default endpoint.
    pub fn new(endpoints: Vec<String>) -> Self {
        let endpoints = if endpoints.is_empty() {
            vec![DEFAULT_RPC_URL.to_string()]
        } else {
            endpoints
        };
        Self {
            endpoints,
            cursor: AtomicUsize::new(0),
            shared: Mutex::new(None),
            commitment: CommitmentConfig::confirmed(),
        }
    }

    /// Commitment level for clients handed out by this pool.
    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Resolve from `SOLANA_RPC_URLS` / `SOLANA_RPC_URL`. Read once; later
    /// environment changes do not affect an existing pool.
    pub fn from_env() -> Self {
        Self::new(resolve_endpoints(
            std::env::var("SOLANA_RPC_URLS").ok(),
            std::env::var("SOLANA_RPC_URL").ok(),
        ))
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Next endpoint in round-robin order, wrapping at the end of the list.
    /// No weighting, no failure-based removal.
    pub fn next_endpoint(&self) -> &str {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.endpoints.len();
        &self.endpoints[idx]
    }

    /// Memoized shared client.
    ///
    /// A new client is built only when the cache is empty or an explicit URL
    /// differs from the cached client's endpoint. Without an explicit URL the
    /// first round-robin pick therefore stays pinned for the pool's lifetime;
    /// callers that want rotation use [`RpcPool::fresh`].
    pub fn shared(&self, url: Option<&str>) -> SolanaClient {
        let mut cached = self.shared.lock().unwrap();
        if let Some(client) = cached.as_ref() {
            let replace = matches!(url, Some(requested) if requested != client.url());
            if !replace {
                return client.clone();
            }
        }
        let endpoint = match url {
            Some(requested) => requested.to_string(),
            None => self.next_endpoint().to_string(),
        };
        tracing::debug!(endpoint = %endpoint, "caching shared RPC client");
        let client = SolanaClient::with_commitment(endpoint, self.commitment);
        *cached = Some(client.clone());
        client
    }

    /// A brand-new client on the next round-robin endpoint. Never cached.
    pub fn fresh(&self) -> SolanaClient {
        SolanaClient::with_commitment(self.next_endpoint().to_string(), self.commitment)
    }

    /// Probe every configured endpoint concurrently, recording latency.
    /// Results come back in configured order, not arrival order.
    pub async fn check_all(&self) -> Vec<HealthReport> {
        let commitment = self.commitment;
        let checks = self.endpoints.iter().map(|url| async move {
            let client = SolanaClient::with_commitment(url.clone(), commitment);
            let started = Instant::now();
            let mut report = check_health(&client).await;
            report.latency_ms = Some(started.elapsed().as_millis() as u64);
            report
        });
        join_all(checks).await
    }
}

/// Probe a single endpoint: slot and version fetched concurrently. Never
/// returns an error; transport failures become an unhealthy report.
pub async fn check_health(client: &SolanaClient) -> HealthReport {
    let (slot, version) = tokio::join!(client.get_slot(), client.get_version());
    match (slot, version) {
        (Ok(slot), Ok(version)) => HealthReport {
            url: client.url(),
            healthy: true,
            slot: Some(slot),
            version: Some(version),
            latency_ms: None,
            error: None,
        },
        (Err(e), _) | (_, Err(e)) => HealthReport {
            url: client.url(),
            healthy: false,
            slot: None,
            version: None,
            latency_ms: None,
            error: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_multi_value_source() {
        let urls = resolve_endpoints(
            Some("https://a,https://b, https://c".to_string()),
            Some("https://single".to_string()),
        );
        assert_eq!(urls, vec!["https://a", "https://b", "https://c"]);
    }

    #[test]
    fn test_resolve_falls_back_to_single_value_source() {
        let urls = resolve_endpoints(None, Some("https://single".to_string()));
        assert_eq!(urls, vec!["https://single"]);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let urls = resolve_endpoints(None, None);
        assert_eq!(urls, vec![DEFAULT_RPC_URL]);
    }

    #[test]
    fn test_resolve_ignores_empty_sources() {
        let urls = resolve_endpoints(Some(" , ".to_string()), Some("  ".to_string()));
        assert_eq!(urls, vec![DEFAULT_RPC_URL]);
    }

    #[test]
    fn test_round_robin_visits_each_endpoint_once_then_wraps() {
        let pool = RpcPool::new(vec![
            "https://a".to_string(),
            "https://b".to_string(),
            "https://c".to_string(),
        ]);
        assert_eq!(pool.next_endpoint(), "https://a");
        assert_eq!(pool.next_endpoint(), "https://b");
        assert_eq!(pool.next_endpoint(), "https://c");
        assert_eq!(pool.next_endpoint(), "https://a");
    }

    #[test]
    fn test_env_style_list_rotates_in_order() {
        let pool = RpcPool::new(resolve_endpoints(Some("a,b,c".to_string()), None));
        assert_eq!(pool.next_endpoint(), "a");
        assert_eq!(pool.next_endpoint(), "b");
        assert_eq!(pool.next_endpoint(), "c");
        assert_eq!(pool.next_endpoint(), "a");
    }

    #[test]
    fn test_empty_list_falls_back_to_default() {
        let pool = RpcPool::new(vec![]);
        assert_eq!(pool.endpoints(), [DEFAULT_RPC_URL.to_string()]);
    }

    #[test]
    fn test_shared_pins_first_round_robin_pick() {
        let pool = RpcPool::new(vec!["https://a".to_string(), "https://b".to_string()]);
        assert_eq!(pool.shared(None).url(), "https://a");
        // No explicit URL: the cached client is reused, the cursor does not
        // advance again.
        assert_eq!(pool.shared(None).url(), "https://a");
        assert_eq!(pool.next_endpoint(), "https://b");
    }

    #[test]
    fn test_shared_replaces_cache_on_different_url() {
        let pool = RpcPool::new(vec!["https://a".to_string(), "https://b".to_string()]);
        assert_eq!(pool.shared(None).url(), "https://a");
        assert_eq!(pool.shared(Some("https://b")).url(), "https://b");
        // Matching URL reuses the cache; no-URL calls stay on the new pin.
        assert_eq!(pool.shared(Some("https://b")).url(), "https://b");
        assert_eq!(pool.shared(None).url(), "https://b");
    }

    #[test]
    fn test_fresh_always_advances() {
        let pool = RpcPool::new(vec!["https://a".to_string(), "https://b".to_string()]);
        assert_eq!(pool.fresh().url(), "https://a");
        assert_eq!(pool.fresh().url(), "https://b");
        assert_eq!(pool.fresh().url(), "https://a");
    }

    #[tokio::test]
    async fn test_check_all_reports_unreachable_endpoints() {
        // Nothing listens on these ports; both probes must fold into
        // unhealthy reports in configured order without erroring.
        let pool = RpcPool::new(vec![
            "http://127.0.0.1:1".to_string(),
            "http://127.0.0.1:2".to_string(),
        ]);
        let reports = pool.check_all().await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].url, "http://127.0.0.1:1");
        assert_eq!(reports[1].url, "http://127.0.0.1:2");
        for report in reports {
            assert!(!report.healthy);
            assert!(report.error.is_some());
            assert!(report.latency_ms.is_some());
        }
    }
}
