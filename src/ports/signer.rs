use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::DecodedTransaction;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Signer {0} is not among the transaction's required signers")]
    UnknownSigner(Pubkey),
    #[error("Failed to sign transaction: {0}")]
    Signing(String),
}

/// Caller-supplied signing capability.
///
/// Implementations must accept either transaction encoding and return the
/// same encoding with their signature applied. The pipeline never holds key
/// material itself.
pub trait TransactionSigner: Send + Sync {
    /// Public key this signer signs for.
    fn pubkey(&self) -> Pubkey;

    /// Apply this signer's signature, preserving the encoding and any
    /// signatures already present.
    fn sign(&self, tx: DecodedTransaction) -> Result<DecodedTransaction, SignerError>;
}
