//! Execution Pipeline
//!
//! Drives a built blink transaction from unsigned artifact to confirmed
//! signature, or to a measured simulation result. The flow is linear with
//! no branching back: decode, then simulate or sign, send, confirm. Each
//! attempt decodes the fetched payload once; retries happen only at the
//! broadcast transport layer.

use std::time::Duration;

use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_response::RpcSimulateTransactionResult;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use solana_transaction_status::TransactionConfirmationStatus;
use thiserror::Error;

use crate::adapters::blink::BlinkTransaction;
use crate::adapters::solana::{SolanaClient, SolanaClientError};
use crate::domain::{DecodeError, DecodedTransaction};
use crate::ports::{SignerError, TransactionSigner};

/// Transport-level retry budget delegated to the send primitive.
const SEND_MAX_RETRIES: usize = 3;
/// Roughly one slot between confirmation polls.
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Signing(#[from] SignerError),

    #[error("RPC transport failed: {0}")]
    Transport(#[from] SolanaClientError),

    #[error("Broadcast failed after {attempts} transport retries: {message}")]
    Broadcast { attempts: usize, message: String },

    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}

/// Split so the caller can decide whether resubmitting is safe: an expired
/// blockhash means the transaction never landed; an execution error means
/// it landed and failed. Resubmission is a caller responsibility either way.
#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("Blockhash expired before confirmation of {signature}")]
    BlockhashExpired { signature: Signature },

    #[error("Transaction {signature} landed but failed: {error}")]
    ExecutionFailed { signature: Signature, error: String },
}

/// Result of a dry run. On-chain failure is data here, never an error.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub success: bool,
    pub logs: Vec<String>,
    /// JSON-stringified on-chain error, when the dry run failed
    pub error: Option<String>,
    pub units_consumed: Option<u64>,
}

impl SimulationOutcome {
    fn from_rpc(result: RpcSimulateTransactionResult) -> Self {
        Self::from_parts(result.err, result.logs, result.units_consumed)
    }

    fn from_parts(
        err: Option<TransactionError>,
        logs: Option<Vec<String>>,
        units_consumed: Option<u64>,
    ) -> Self {
        let error =
            err.map(|e| serde_json::to_string(&e).unwrap_or_else(|_| e.to_string()));
        Self {
            success: error.is_none(),
            logs: logs.unwrap_or_default(),
            error,
            units_consumed,
        }
    }
}

/// Orchestrates decode, simulate, sign, broadcast and confirmation against
/// one RPC client.
pub struct BlinkExecutor {
    rpc: SolanaClient,
}

impl BlinkExecutor {
    pub fn new(rpc: SolanaClient) -> Self {
        Self { rpc }
    }

    /// Dry-run the artifact without broadcasting.
    ///
    /// Never mutates chain state. An on-chain failure comes back as
    /// `success: false`; only transport problems return `Err`.
    pub async fn simulate(
        &self,
        artifact: &BlinkTransaction,
    ) -> Result<SimulationOutcome, ExecutionError> {
        let decoded = DecodedTransaction::decode_base64(&artifact.transaction)?;
        tracing::debug!(variant = decoded.variant(), "simulating transaction");
        let result = self.rpc.simulate_transaction(&decoded).await?;
        Ok(SimulationOutcome::from_rpc(result))
    }

    /// Decode, sign with the injected capability, broadcast, then poll until
    /// the signature reaches confirmed commitment or the blockhash expires.
    ///
    /// A signer failure propagates before anything is broadcast.
    pub async fn sign_and_send(
        &self,
        artifact: &BlinkTransaction,
        signer: &dyn TransactionSigner,
    ) -> Result<Signature, ExecutionError> {
        let decoded = DecodedTransaction::decode_base64(&artifact.transaction)?;
        tracing::debug!(variant = decoded.variant(), "signing transaction");
        let signed = signer.sign(decoded)?;

        let config = RpcSendTransactionConfig {
            skip_preflight: false,
            max_retries: Some(SEND_MAX_RETRIES),
            ..RpcSendTransactionConfig::default()
        };
        let signature = self
            .rpc
            .send_transaction(&signed, config)
            .await
            .map_err(|e| ExecutionError::Broadcast {
                attempts: SEND_MAX_RETRIES,
                message: e.to_string(),
            })?;
        tracing::info!(%signature, "transaction broadcast");

        let (_, last_valid_block_height) = self.rpc.latest_blockhash().await?;
        self.await_confirmation(signature, last_valid_block_height)
            .await?;
        tracing::info!(%signature, "transaction confirmed");
        Ok(signature)
    }

    async fn await_confirmation(
        &self,
        signature: Signature,
        last_valid_block_height: u64,
    ) -> Result<(), ExecutionError> {
        loop {
            if let Some(status) = self.rpc.get_signature_status(&signature).await? {
                if let Some(err) = status.err {
                    return Err(ConfirmationError::ExecutionFailed {
                        signature,
                        error: err.to_string(),
                    }
                    .into());
                }
                if matches!(
                    status.confirmation_status(),
                    TransactionConfirmationStatus::Confirmed
                        | TransactionConfirmationStatus::Finalized
                ) {
                    return Ok(());
                }
            }

            if self.rpc.get_block_height().await? > last_valid_block_height {
                return Err(ConfirmationError::BlockhashExpired { signature }.into());
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockSigner;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use solana_sdk::transaction::Transaction;

    fn artifact() -> BlinkTransaction {
        let bytes = bincode::serialize(&Transaction::default()).unwrap();
        BlinkTransaction {
            transaction: BASE64.encode(bytes),
            message: None,
        }
    }

    // Nothing listens here; reaching the transport at all is a test failure.
    fn executor() -> BlinkExecutor {
        BlinkExecutor::new(SolanaClient::new("http://127.0.0.1:1".to_string()))
    }

    #[test]
    fn test_simulation_outcome_success() {
        let outcome = SimulationOutcome::from_parts(
            None,
            Some(vec!["Program log: ok".to_string()]),
            Some(1200),
        );
        assert!(outcome.success);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.logs.len(), 1);
        assert_eq!(outcome.units_consumed, Some(1200));
    }

    #[test]
    fn test_simulation_outcome_on_chain_failure() {
        let outcome =
            SimulationOutcome::from_parts(Some(TransactionError::AccountNotFound), None, None);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("\"AccountNotFound\""));
        assert!(outcome.logs.is_empty());
    }

    #[tokio::test]
    async fn test_sign_and_send_propagates_signer_failure() {
        let signer = MockSigner::new().with_failure("hardware wallet unplugged");

        let result = executor().sign_and_send(&artifact(), &signer).await;
        assert!(matches!(result, Err(ExecutionError::Signing(_))));
        assert_eq!(signer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_and_send_rejects_undecodable_artifact() {
        let signer = MockSigner::new();
        let artifact = BlinkTransaction {
            transaction: "////".to_string(),
            message: None,
        };

        let result = executor().sign_and_send(&artifact, &signer).await;
        assert!(matches!(result, Err(ExecutionError::Decode(_))));
        // The signer must never be reached with a payload that failed to
        // decode.
        assert_eq!(signer.call_count(), 0);
    }

    #[tokio::test]
    async fn test_simulate_rejects_undecodable_artifact() {
        let artifact = BlinkTransaction {
            transaction: "not base64 at all!!".to_string(),
            message: None,
        };

        let result = executor().simulate(&artifact).await;
        assert!(matches!(result, Err(ExecutionError::Decode(_))));
    }
}
