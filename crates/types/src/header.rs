//! Block header payloads.

use crate::ShardId;
use serde::{Deserialize, Serialize};

/// Accessors shared by shard and metachain headers.
///
/// Both header flavors go through the same structural admission checks, which
/// only need read access to the consensus-critical fields.
pub trait HeaderFields {
    fn nonce(&self) -> u64;
    fn round(&self) -> u64;
    fn epoch(&self) -> u32;
    fn shard_id(&self) -> ShardId;
    fn prev_hash(&self) -> &[u8];
    fn prev_rand_seed(&self) -> &[u8];
    fn rand_seed(&self) -> &[u8];
    fn pub_keys_bitmap(&self) -> &[u8];
    fn signature(&self) -> &[u8];
    fn root_hash(&self) -> &[u8];
    fn chain_id(&self) -> &[u8];
}

/// A block header produced by one shard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardHeader {
    pub nonce: u64,
    pub round: u64,
    pub epoch: u32,
    pub shard_id: ShardId,
    pub prev_hash: Vec<u8>,
    pub prev_rand_seed: Vec<u8>,
    pub rand_seed: Vec<u8>,
    pub pub_keys_bitmap: Vec<u8>,
    pub signature: Vec<u8>,
    pub root_hash: Vec<u8>,
    pub chain_id: Vec<u8>,
    /// Hashes of the miniblocks the header commits to.
    pub miniblock_hashes: Vec<Vec<u8>>,
}

impl HeaderFields for ShardHeader {
    fn nonce(&self) -> u64 {
        self.nonce
    }
    fn round(&self) -> u64 {
        self.round
    }
    fn epoch(&self) -> u32 {
        self.epoch
    }
    fn shard_id(&self) -> ShardId {
        self.shard_id
    }
    fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }
    fn prev_rand_seed(&self) -> &[u8] {
        &self.prev_rand_seed
    }
    fn rand_seed(&self) -> &[u8] {
        &self.rand_seed
    }
    fn pub_keys_bitmap(&self) -> &[u8] {
        &self.pub_keys_bitmap
    }
    fn signature(&self) -> &[u8] {
        &self.signature
    }
    fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }
    fn chain_id(&self) -> &[u8] {
        &self.chain_id
    }
}

/// A block header produced by the metachain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaHeader {
    pub nonce: u64,
    pub round: u64,
    pub epoch: u32,
    pub prev_hash: Vec<u8>,
    pub prev_rand_seed: Vec<u8>,
    pub rand_seed: Vec<u8>,
    pub pub_keys_bitmap: Vec<u8>,
    pub signature: Vec<u8>,
    pub root_hash: Vec<u8>,
    pub chain_id: Vec<u8>,
    /// Per-shard header hashes the metachain notarizes.
    pub shard_header_hashes: Vec<Vec<u8>>,
}

impl HeaderFields for MetaHeader {
    fn nonce(&self) -> u64 {
        self.nonce
    }
    fn round(&self) -> u64 {
        self.round
    }
    fn epoch(&self) -> u32 {
        self.epoch
    }
    fn shard_id(&self) -> ShardId {
        ShardId::METACHAIN
    }
    fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }
    fn prev_rand_seed(&self) -> &[u8] {
        &self.prev_rand_seed
    }
    fn rand_seed(&self) -> &[u8] {
        &self.rand_seed
    }
    fn pub_keys_bitmap(&self) -> &[u8] {
        &self.pub_keys_bitmap
    }
    fn signature(&self) -> &[u8] {
        &self.signature
    }
    fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }
    fn chain_id(&self) -> &[u8] {
        &self.chain_id
    }
}
