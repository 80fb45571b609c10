//! Wire serialization seam.
//!
//! Payload types are plain serde structs; the codec turns them into bytes
//! and back. Components that decode inbound payloads take a `C: Codec`
//! bound; the seam is generic rather than object-safe, the same way the
//! network and storage seams are used elsewhere.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors from encoding or decoding a payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),

    /// The payload is larger than the decoder is willing to read.
    #[error("payload too large ({len} bytes, limit {limit})")]
    TooLarge { len: usize, limit: usize },
}

/// Serializes and deserializes wire payloads.
pub trait Codec: Send + Sync + 'static {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Bincode-backed codec with a hard inbound size limit.
#[derive(Debug, Clone)]
pub struct BincodeCodec {
    max_payload_len: usize,
}

impl BincodeCodec {
    /// Default cap on a single inbound payload.
    pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 1 << 20;

    pub fn new(max_payload_len: usize) -> Self {
        Self { max_payload_len }
    }
}

impl Default for BincodeCodec {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PAYLOAD_LEN)
    }
}

impl Codec for BincodeCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bincode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        if bytes.len() > self.max_payload_len {
            return Err(CodecError::TooLarge {
                len: bytes.len(),
                limit: self.max_payload_len,
            });
        }
        bincode::deserialize(bytes).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shardline_types::{Address, Transaction};

    fn sample_tx() -> Transaction {
        Transaction {
            nonce: 7,
            value: 100,
            receiver: Address::from_bytes(vec![2u8; 32]),
            sender: Address::from_bytes(vec![1u8; 32]),
            gas_price: 10,
            gas_limit: 50_000,
            data: b"call".to_vec(),
            signature: vec![0xab; 64],
        }
    }

    #[test]
    fn test_roundtrip() {
        let codec = BincodeCodec::default();
        let tx = sample_tx();
        let bytes = codec.encode(&tx).unwrap();
        let back: Transaction = codec.decode(&bytes).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = BincodeCodec::default();
        let result: Result<Transaction, _> = codec.decode(&[0xff, 0x00, 0x01]);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_limit() {
        let codec = BincodeCodec::new(8);
        let result: Result<Transaction, _> = codec.decode(&[0u8; 16]);
        assert_eq!(
            result.unwrap_err(),
            CodecError::TooLarge { len: 16, limit: 8 }
        );
    }
}
