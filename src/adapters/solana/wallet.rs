use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, VersionedTransaction},
};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::domain::DecodedTransaction;
use crate::ports::signer::{SignerError, TransactionSigner};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Failed to load keypair from file: {0}")]
    LoadError(String),
    #[error("Invalid keypair bytes: {0}")]
    InvalidKeypair(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Wallet manager for loading and signing with Solana keypairs
pub struct WalletManager {
    keypair: Keypair,
}

impl WalletManager {
    /// Load keypair from a file path (JSON array format)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::LoadError(format!("Failed to read file: {}", e)))?;

        // Parse JSON array of bytes
        let bytes: Vec<u8> = serde_json::from_str(&contents)
            .map_err(|e| WalletError::LoadError(format!("Invalid JSON format: {}", e)))?;

        Self::from_bytes(&bytes)
    }

    /// Load keypair from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let keypair = Keypair::try_from(bytes)
            .map_err(|e| WalletError::InvalidKeypair(e.to_string()))?;

        Ok(Self { keypair })
    }

    /// Create a new random keypair (for testing)
    pub fn new_random() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    /// Get the public key as a string
    pub fn public_key(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    /// Index of this wallet among the transaction's required signers
    fn signer_index(&self, signer_keys: &[Pubkey]) -> Result<usize, SignerError> {
        signer_keys
            .iter()
            .position(|key| *key == self.keypair.pubkey())
            .ok_or(SignerError::UnknownSigner(self.keypair.pubkey()))
    }

    fn sign_legacy(&self, mut tx: Transaction) -> Result<Transaction, SignerError> {
        let required = tx.message.header.num_required_signatures as usize;
        let signer_keys = &tx.message.account_keys[..required.min(tx.message.account_keys.len())];
        self.signer_index(signer_keys)?;

        let blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| SignerError::Signing(e.to_string()))?;
        Ok(tx)
    }

    fn sign_versioned(
        &self,
        mut tx: VersionedTransaction,
    ) -> Result<VersionedTransaction, SignerError> {
        let required = tx.message.header().num_required_signatures as usize;
        let static_keys = tx.message.static_account_keys();
        let index = self.signer_index(&static_keys[..required.min(static_keys.len())])?;

        let signature = self.keypair.sign_message(&tx.message.serialize());
        if tx.signatures.len() < required {
            tx.signatures.resize(required, Signature::default());
        }
        tx.signatures[index] = signature;
        Ok(tx)
    }
}

impl TransactionSigner for WalletManager {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    fn sign(&self, tx: DecodedTransaction) -> Result<DecodedTransaction, SignerError> {
        match tx {
            DecodedTransaction::Legacy(tx) => self.sign_legacy(tx).map(DecodedTransaction::Legacy),
            DecodedTransaction::Versioned(tx) => {
                self.sign_versioned(tx).map(DecodedTransaction::Versioned)
            }
        }
    }
}

// Implement Clone for WalletManager by re-creating from bytes
impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: Keypair::try_from(&self.keypair.to_bytes()[..]).unwrap(),
        }
    }
}
