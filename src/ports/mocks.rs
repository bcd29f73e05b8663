use std::sync::{Arc, Mutex};

use solana_sdk::pubkey::Pubkey;

use super::signer::{SignerError, TransactionSigner};
use crate::domain::DecodedTransaction;

/// Mock signer that records calls and allows a controlled failure
#[derive(Debug)]
pub struct MockSigner {
    pubkey: Pubkey,
    calls: Arc<Mutex<usize>>,
    fail_with: Option<String>,
}

impl MockSigner {
    pub fn new() -> Self {
        Self {
            pubkey: Pubkey::new_unique(),
            calls: Arc::new(Mutex::new(0)),
            fail_with: None,
        }
    }

    /// Builder method to make every sign call fail with the given message
    pub fn with_failure(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    /// Number of sign calls recorded
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionSigner for MockSigner {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    fn sign(&self, tx: DecodedTransaction) -> Result<DecodedTransaction, SignerError> {
        *self.calls.lock().unwrap() += 1;
        match &self.fail_with {
            Some(message) => Err(SignerError::Signing(message.clone())),
            None => Ok(tx),
        }
    }
}
