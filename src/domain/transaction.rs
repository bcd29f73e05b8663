//! Transaction Decoding
//!
//! Action servers return an opaque base64 payload that may be either the
//! versioned or the legacy wire encoding. Decoding tries the versioned
//! format first and falls back to legacy for older action servers.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use thiserror::Error;

/// Errors that can occur while turning an action payload into a transaction
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is neither a versioned nor a legacy transaction (versioned: {versioned}; legacy: {legacy})")]
    UnknownEncoding { versioned: String, legacy: String },

    #[error("Failed to serialize transaction: {0}")]
    Serialize(String),
}

/// A transaction decoded from an action server payload.
///
/// The pipeline treats both encodings uniformly; the variant only matters
/// at the serialization boundary.
#[derive(Debug, Clone)]
pub enum DecodedTransaction {
    Versioned(VersionedTransaction),
    Legacy(Transaction),
}

impl DecodedTransaction {
    /// Decode a base64-encoded payload as returned by an action server.
    pub fn decode_base64(payload: &str) -> Result<Self, DecodeError> {
        let bytes = BASE64.decode(payload)?;
        Self::decode(&bytes)
    }

    /// Ordered trial decode: versioned first, then legacy.
    ///
    /// Failure on both paths is fatal, there is no further fallback.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let versioned_err = match bincode::deserialize::<VersionedTransaction>(bytes) {
            Ok(tx) => return Ok(Self::Versioned(tx)),
            Err(e) => e,
        };
        match bincode::deserialize::<Transaction>(bytes) {
            Ok(tx) => Ok(Self::Legacy(tx)),
            Err(legacy_err) => Err(DecodeError::UnknownEncoding {
                versioned: versioned_err.to_string(),
                legacy: legacy_err.to_string(),
            }),
        }
    }

    /// Wire bytes for broadcast.
    pub fn serialize(&self) -> Result<Vec<u8>, DecodeError> {
        match self {
            Self::Versioned(tx) => bincode::serialize(tx),
            Self::Legacy(tx) => bincode::serialize(tx),
        }
        .map_err(|e| DecodeError::Serialize(e.to_string()))
    }

    /// First signature slot, i.e. the transaction id once the fee payer
    /// has signed.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Versioned(tx) => tx.signatures.first(),
            Self::Legacy(tx) => tx.signatures.first(),
        }
    }

    /// Variant name for logging.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Versioned(_) => "versioned",
            Self::Legacy(_) => "legacy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::message::{v0, Message, MessageHeader, VersionedMessage};
    use solana_sdk::pubkey::Pubkey;

    fn legacy_tx(num_required_signatures: u8) -> Transaction {
        Transaction {
            signatures: vec![],
            message: Message {
                header: MessageHeader {
                    num_required_signatures,
                    num_readonly_signed_accounts: 0,
                    num_readonly_unsigned_accounts: 0,
                },
                account_keys: vec![],
                recent_blockhash: Hash::default(),
                instructions: vec![],
            },
        }
    }

    #[test]
    fn test_decode_v0_transaction() {
        let tx = VersionedTransaction {
            signatures: vec![Signature::default()],
            message: VersionedMessage::V0(v0::Message {
                header: MessageHeader {
                    num_required_signatures: 1,
                    num_readonly_signed_accounts: 0,
                    num_readonly_unsigned_accounts: 0,
                },
                account_keys: vec![Pubkey::new_unique()],
                recent_blockhash: Hash::default(),
                instructions: vec![],
                address_table_lookups: vec![],
            }),
        };
        let bytes = bincode::serialize(&tx).unwrap();

        let decoded = DecodedTransaction::decode(&bytes).unwrap();
        assert_eq!(decoded.variant(), "versioned");
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn test_legacy_only_payload_falls_through() {
        // A header byte with the version bit set is rejected by the
        // versioned parser but is a plain u8 to the legacy one.
        let tx = legacy_tx(0xC8);
        let bytes = bincode::serialize(&tx).unwrap();
        assert!(bincode::deserialize::<VersionedTransaction>(&bytes).is_err());

        let decoded = DecodedTransaction::decode(&bytes).unwrap();
        assert_eq!(decoded.variant(), "legacy");
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn test_garbage_fails_both_paths() {
        let result = DecodedTransaction::decode(&[0xFF; 7]);
        assert!(matches!(
            result,
            Err(DecodeError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn test_decode_base64_round_trip() {
        let tx = legacy_tx(0xC8);
        let bytes = bincode::serialize(&tx).unwrap();
        let payload = BASE64.encode(&bytes);

        let decoded = DecodedTransaction::decode_base64(&payload).unwrap();
        assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn test_invalid_base64() {
        let result = DecodedTransaction::decode_base64("not/valid==base64!!");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_signature_accessor() {
        let tx = legacy_tx(0xC8);
        let decoded = DecodedTransaction::Legacy(tx);
        assert!(decoded.signature().is_none());
    }
}
