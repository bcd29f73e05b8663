use solana_client::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_response::RpcSimulateTransactionResult;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_transaction_status::TransactionStatus;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::DecodedTransaction;

#[derive(Debug, Error)]
pub enum SolanaClientError {
    #[error("RPC request failed: {0}")]
    Rpc(String),
}

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
}

impl SolanaClient {
    /// Create a new Solana RPC client at confirmed commitment
    pub fn new(rpc_url: String) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    /// Create a new Solana RPC client at an explicit commitment level
    pub fn with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self { client }
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> String {
        self.client.url()
    }

    /// Get the current slot
    pub async fn get_slot(&self) -> Result<u64, SolanaClientError> {
        let client = Arc::clone(&self.client);
        // Spawn blocking to make sync RPC call async-compatible
        tokio::task::spawn_blocking(move || {
            client
                .get_slot()
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Get the node's software version string
    pub async fn get_version(&self) -> Result<String, SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_version()
                .map(|version| version.solana_core)
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Get the current block height
    pub async fn get_block_height(&self) -> Result<u64, SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_block_height()
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Latest blockhash plus the block height at which it expires
    pub async fn latest_blockhash(&self) -> Result<(Hash, u64), SolanaClientError> {
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_latest_blockhash_with_commitment(client.commitment())
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Dry-run a transaction without broadcasting it.
    ///
    /// An on-chain error ends up in the result's `err` field; `Err` here
    /// means the transport itself failed.
    pub async fn simulate_transaction(
        &self,
        tx: &DecodedTransaction,
    ) -> Result<RpcSimulateTransactionResult, SolanaClientError> {
        let tx = tx.clone();
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let response = match &tx {
                DecodedTransaction::Versioned(tx) => client.simulate_transaction(tx),
                DecodedTransaction::Legacy(tx) => client.simulate_transaction(tx),
            };
            response
                .map(|r| r.value)
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Broadcast a signed transaction
    pub async fn send_transaction(
        &self,
        tx: &DecodedTransaction,
        config: RpcSendTransactionConfig,
    ) -> Result<Signature, SolanaClientError> {
        let tx = tx.clone();
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            let result = match &tx {
                DecodedTransaction::Versioned(tx) => {
                    client.send_transaction_with_config(tx, config)
                }
                DecodedTransaction::Legacy(tx) => {
                    client.send_transaction_with_config(tx, config)
                }
            };
            result.map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }

    /// Status of a broadcast signature, if the node has seen it
    pub async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionStatus>, SolanaClientError> {
        let signature = *signature;
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_signature_statuses(&[signature])
                .map(|r| r.value.into_iter().next().flatten())
                .map_err(|e| SolanaClientError::Rpc(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::Rpc(format!("Task join error: {}", e)))?
    }
}
