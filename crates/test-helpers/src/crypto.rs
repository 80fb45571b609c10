//! Crypto and validation test doubles.

use dashmap::DashMap;
use shardline_core::{
    AddressScheme, Blacklist, BlockSignatureVerifier, ChronologyValidator, FeeChecker,
    KeyGenerator, ProcessError, SignatureVerifier,
};
use shardline_types::{Hash, ShardId};

/// The signature the [`TestSignatureVerifier`] accepts for `message`.
pub fn test_signature(message: &[u8]) -> Vec<u8> {
    Hash::from_bytes(message).as_ref().to_vec()
}

/// Accepts 32-byte public keys.
#[derive(Debug, Default)]
pub struct TestKeyGenerator;

impl KeyGenerator for TestKeyGenerator {
    fn public_key_from_bytes(&self, bytes: &[u8]) -> Result<(), ProcessError> {
        if bytes.len() != 32 {
            return Err(ProcessError::InvalidPublicKey);
        }
        Ok(())
    }
}

/// Accepts a signature iff it equals [`test_signature`] of the message.
#[derive(Debug, Default)]
pub struct TestSignatureVerifier;

impl SignatureVerifier for TestSignatureVerifier {
    fn verify(
        &self,
        _public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ProcessError> {
        if signature == test_signature(message).as_slice() {
            Ok(())
        } else {
            Err(ProcessError::InvalidSignature)
        }
    }
}

/// Block signature verifier with a fixed verdict.
#[derive(Debug)]
pub struct StubBlockSignatureVerifier {
    pub valid: bool,
}

impl Default for StubBlockSignatureVerifier {
    fn default() -> Self {
        Self { valid: true }
    }
}

impl BlockSignatureVerifier for StubBlockSignatureVerifier {
    fn verify_signature(
        &self,
        _header_hash: &Hash,
        _pub_keys_bitmap: &[u8],
        _signature: &[u8],
    ) -> Result<(), ProcessError> {
        if self.valid {
            Ok(())
        } else {
            Err(ProcessError::InvalidSignature)
        }
    }
}

/// Chronology validator with a fixed verdict.
#[derive(Debug)]
pub struct StubChronologyValidator {
    pub valid: bool,
}

impl Default for StubChronologyValidator {
    fn default() -> Self {
        Self { valid: true }
    }
}

impl ChronologyValidator for StubChronologyValidator {
    fn validate_received_block(
        &self,
        _shard: ShardId,
        _epoch: u32,
        _nonce: u64,
        _round: u64,
    ) -> Result<(), ProcessError> {
        if self.valid {
            Ok(())
        } else {
            Err(ProcessError::InvalidChronology("stubbed rejection"))
        }
    }
}

/// Fee checker enforcing a minimum gas price.
#[derive(Debug, Default)]
pub struct StubFeeChecker {
    pub min_gas_price: u64,
}

impl FeeChecker for StubFeeChecker {
    fn check_tx_values(&self, gas_price: u64, _gas_limit: u64) -> Result<(), ProcessError> {
        if gas_price < self.min_gas_price {
            return Err(ProcessError::FeeRejected("gas price below minimum"));
        }
        Ok(())
    }
}

/// Keyed deny list backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryBlacklist {
    keys: DashMap<Vec<u8>, ()>,
}

impl InMemoryBlacklist {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Blacklist for InMemoryBlacklist {
    fn has(&self, key: &[u8]) -> bool {
        self.keys.contains_key(key)
    }

    fn add(&self, key: Vec<u8>) {
        self.keys.insert(key, ());
    }
}

/// 32-byte addresses.
#[derive(Debug, Default)]
pub struct TestAddressScheme;

impl AddressScheme for TestAddressScheme {
    fn address_len(&self) -> usize {
        32
    }
}
