//! Collaborator seams consumed by the ingestion pipeline.
//!
//! Each trait is narrow and object-safe: production wiring hands the
//! pipeline `Arc<dyn …>` handles, tests hand it the in-memory versions from
//! `shardline-test-helpers`. Handles are required constructor parameters
//! everywhere they are consumed, so a half-wired pipeline cannot exist.

use crate::ProcessError;
use shardline_types::{Address, Hash, RoundIndex, ShardId};

/// Maps addresses to shards and names the transport channels between them.
pub trait ShardCoordinator: Send + Sync {
    /// The shard this node validates for.
    fn self_id(&self) -> ShardId;

    /// Number of regular (non-metachain) shards.
    fn number_of_shards(&self) -> u32;

    /// The shard an address belongs to.
    fn compute_id(&self, address: &Address) -> ShardId;

    /// Suffix identifying the communication channel between the self shard
    /// and `other`: `_S` within one shard, `_A_B` (lower id first) across
    /// shards, `_S_META` toward the metachain.
    fn communication_identifier(&self, other: ShardId) -> String {
        let me = self.self_id();
        if me == other {
            return format!("_{me}");
        }
        if other.is_metachain() {
            return format!("_{me}_META");
        }
        if me.is_metachain() {
            return format!("_{other}_META");
        }
        let (lo, hi) = if me.0 < other.0 { (me, other) } else { (other, me) };
        format!("_{lo}_{hi}")
    }
}

/// Monotonic non-decreasing consensus round index.
pub trait RoundClock: Send + Sync {
    fn index(&self) -> RoundIndex;
}

/// Read access to account state, as far as admission checks need it.
pub trait AccountsAdapter: Send + Sync {
    /// Current nonce of `address`, or `None` when the account is unknown.
    fn account_nonce(&self, address: &Address) -> Option<u64>;
}

/// Validates public key bytes against the configured key scheme.
pub trait KeyGenerator: Send + Sync {
    fn public_key_from_bytes(&self, bytes: &[u8]) -> Result<(), ProcessError>;
}

/// Verifies a single signature over a message.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8])
        -> Result<(), ProcessError>;
}

/// Verifies the aggregated consensus signature carried by a block header.
///
/// Implementations consume the multi-signer of the active validator group;
/// this pipeline only needs the yes/no answer.
pub trait BlockSignatureVerifier: Send + Sync {
    fn verify_signature(
        &self,
        header_hash: &Hash,
        pub_keys_bitmap: &[u8],
        signature: &[u8],
    ) -> Result<(), ProcessError>;
}

/// Validates a received header's epoch/round/nonce against chain time.
pub trait ChronologyValidator: Send + Sync {
    fn validate_received_block(
        &self,
        shard: ShardId,
        epoch: u32,
        nonce: u64,
        round: u64,
    ) -> Result<(), ProcessError>;
}

/// Fee sanity rules for user transactions.
pub trait FeeChecker: Send + Sync {
    fn check_tx_values(&self, gas_price: u64, gas_limit: u64) -> Result<(), ProcessError>;
}

/// Keyed deny list consulted before any pool write.
pub trait Blacklist: Send + Sync {
    fn has(&self, key: &[u8]) -> bool;
    fn add(&self, key: Vec<u8>);
}

/// Shape rules for addresses on this chain.
pub trait AddressScheme: Send + Sync {
    /// Expected address length in bytes.
    fn address_len(&self) -> usize;

    /// Parse and validate raw bytes as an address.
    fn parse(&self, bytes: &[u8]) -> Result<Address, ProcessError> {
        if bytes.len() != self.address_len() {
            return Err(ProcessError::InvalidAddress("wrong length"));
        }
        Ok(Address::from_bytes(bytes))
    }
}

/// Content hashing seam.
pub trait Hasher: Send + Sync {
    fn compute(&self, data: &[u8]) -> Hash;
}

/// The default hasher: Blake3 via [`Hash::from_bytes`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn compute(&self, data: &[u8]) -> Hash {
        Hash::from_bytes(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Coordinator {
        self_id: ShardId,
    }

    impl ShardCoordinator for Coordinator {
        fn self_id(&self) -> ShardId {
            self.self_id
        }
        fn number_of_shards(&self) -> u32 {
            3
        }
        fn compute_id(&self, address: &Address) -> ShardId {
            ShardId(address.as_bytes().last().copied().unwrap_or(0) as u32 % 3)
        }
    }

    #[test]
    fn test_communication_identifier_forms() {
        let c = Coordinator { self_id: ShardId(1) };
        assert_eq!(c.communication_identifier(ShardId(1)), "_1");
        assert_eq!(c.communication_identifier(ShardId(0)), "_0_1");
        assert_eq!(c.communication_identifier(ShardId(2)), "_1_2");
        assert_eq!(c.communication_identifier(ShardId::METACHAIN), "_1_META");
    }

    #[test]
    fn test_communication_identifier_from_meta() {
        let c = Coordinator {
            self_id: ShardId::METACHAIN,
        };
        assert_eq!(c.communication_identifier(ShardId(2)), "_2_META");
        assert_eq!(c.communication_identifier(ShardId::METACHAIN), "_META");
    }
}
