//! Transaction block body (miniblocks) interception.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{Codec, Hasher, ProcessError, ShardCoordinator};
use shardline_types::{BlockBody, Hash, ShardId};
use std::sync::Arc;

/// A decoded block body.
#[derive(Debug, Clone)]
pub struct InterceptedBlockBody {
    pub body: BlockBody,
    hash: Hash,
    for_current_shard: bool,
}

impl InterceptedPayload for InterceptedBlockBody {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        self.for_current_shard
    }

    fn payload_type(&self) -> &'static str {
        "block body"
    }
}

/// Decodes and validates block bodies.
pub struct BlockBodyFactory<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
    coordinator: Arc<dyn ShardCoordinator>,
}

impl<C: Codec> BlockBodyFactory<C> {
    pub fn new(
        codec: Arc<C>,
        hasher: Arc<dyn Hasher>,
        coordinator: Arc<dyn ShardCoordinator>,
    ) -> Self {
        Self {
            codec,
            hasher,
            coordinator,
        }
    }

    fn shard_in_range(&self, shard: ShardId) -> bool {
        shard.is_metachain() || shard.0 < self.coordinator.number_of_shards()
    }
}

impl<C: Codec> PayloadFactory<InterceptedBlockBody> for BlockBodyFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedBlockBody, ProcessError> {
        let body: BlockBody = self.codec.decode(raw)?;
        let hash = self.hasher.compute(raw);
        let me = self.coordinator.self_id();
        let for_current_shard = body
            .miniblocks
            .iter()
            .any(|mb| mb.sender_shard == me || mb.receiver_shard == me);
        Ok(InterceptedBlockBody {
            body,
            hash,
            for_current_shard,
        })
    }

    fn check_validity(&self, payload: &InterceptedBlockBody) -> Result<(), ProcessError> {
        let num_shards = self.coordinator.number_of_shards();
        for miniblock in &payload.body.miniblocks {
            if !self.shard_in_range(miniblock.sender_shard) {
                return Err(ProcessError::ShardIdOutOfRange {
                    shard: miniblock.sender_shard,
                    num_shards,
                });
            }
            if !self.shard_in_range(miniblock.receiver_shard) {
                return Err(ProcessError::ShardIdOutOfRange {
                    shard: miniblock.receiver_shard,
                    num_shards,
                });
            }
        }
        Ok(())
    }
}
