//! Reward transaction interception.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{Codec, Hasher, ProcessError, ShardCoordinator};
use shardline_types::{Hash, RewardTransaction, ShardId};
use std::sync::Arc;

/// A decoded reward payout. Rewards always travel metachain -> receiver
/// shard.
#[derive(Debug, Clone)]
pub struct InterceptedRewardTx {
    pub rtx: RewardTransaction,
    hash: Hash,
    pub receiver_shard: ShardId,
    for_current_shard: bool,
}

impl InterceptedPayload for InterceptedRewardTx {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        self.for_current_shard
    }

    fn payload_type(&self) -> &'static str {
        "reward transaction"
    }
}

/// Decodes and validates reward payouts.
pub struct RewardTxFactory<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
    coordinator: Arc<dyn ShardCoordinator>,
}

impl<C: Codec> RewardTxFactory<C> {
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
}

impl<C: Codec> PayloadFactory<InterceptedRewardTx> for RewardTxFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedRewardTx, ProcessError> {
        let rtx: RewardTransaction = self.codec.decode(raw)?;
        let hash = self.hasher.compute(raw);
        let receiver_shard = if rtx.receiver.is_empty() {
            self.coordinator.self_id()
        } else {
            self.coordinator.compute_id(&rtx.receiver)
        };
        Ok(InterceptedRewardTx {
            rtx,
            hash,
            receiver_shard,
            for_current_shard: receiver_shard == self.coordinator.self_id(),
        })
    }

    fn check_validity(&self, payload: &InterceptedRewardTx) -> Result<(), ProcessError> {
        if payload.rtx.receiver.as_bytes().is_empty() {
            return Err(ProcessError::EmptyField("receiver"));
        }
        Ok(())
    }
}
