//! Shard coordination and round clock test doubles.

use shardline_core::{RoundClock, ShardCoordinator};
use shardline_types::{Address, RoundIndex, ShardId};
use std::sync::atomic::{AtomicI64, Ordering};

/// Coordinator mapping an address to `last byte % number_of_shards`.
pub struct LastByteShardCoordinator {
    self_id: ShardId,
    num_shards: u32,
}

impl LastByteShardCoordinator {
    pub fn new(self_id: ShardId, num_shards: u32) -> Self {
        Self {
            self_id,
            num_shards,
        }
    }

    /// An address that `compute_id` maps to `shard`.
    pub fn address_in_shard(&self, shard: ShardId) -> Address {
        let mut bytes = vec![1u8; 32];
        bytes[31] = shard.0 as u8;
        Address::from_bytes(bytes)
    }
}

impl ShardCoordinator for LastByteShardCoordinator {
    fn self_id(&self) -> ShardId {
        self.self_id
    }

    fn number_of_shards(&self) -> u32 {
        self.num_shards
    }

    fn compute_id(&self, address: &Address) -> ShardId {
        let last = address.as_bytes().last().copied().unwrap_or(0);
        ShardId(last as u32 % self.num_shards)
    }
}

/// Round clock advanced by hand from tests.
#[derive(Debug, Default)]
pub struct ManualRoundClock {
    index: AtomicI64,
}

impl ManualRoundClock {
    pub fn new(start: RoundIndex) -> Self {
        Self {
            index: AtomicI64::new(start),
        }
    }

    pub fn set(&self, index: RoundIndex) {
        self.index.store(index, Ordering::Release);
    }
}

impl RoundClock for ManualRoundClock {
    fn index(&self) -> RoundIndex {
        self.index.load(Ordering::Acquire)
    }
}
