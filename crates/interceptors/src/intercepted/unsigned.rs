//! Smart-contract result interception.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use shardline_core::{Codec, Hasher, ProcessError, ShardCoordinator};
use shardline_types::{Address, Hash, ShardId, UnsignedTransaction};
use std::sync::Arc;

/// A decoded smart-contract result with its resolved shard route.
#[derive(Debug, Clone)]
pub struct InterceptedUnsignedTx {
    pub utx: UnsignedTransaction,
    hash: Hash,
    pub sender_shard: ShardId,
    pub receiver_shard: ShardId,
    for_current_shard: bool,
}

impl InterceptedPayload for InterceptedUnsignedTx {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn is_for_current_shard(&self) -> bool {
        self.for_current_shard
    }

    fn payload_type(&self) -> &'static str {
        "unsigned transaction"
    }
}

/// Decodes and validates smart-contract results.
pub struct UnsignedTxFactory<C: Codec> {
    codec: Arc<C>,
    hasher: Arc<dyn Hasher>,
    coordinator: Arc<dyn ShardCoordinator>,
}

impl<C: Codec> UnsignedTxFactory<C> {
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

    fn shard_of(&self, address: &Address) -> ShardId {
        if address.is_empty() {
            self.coordinator.self_id()
        } else {
            self.coordinator.compute_id(address)
        }
    }
}

impl<C: Codec> PayloadFactory<InterceptedUnsignedTx> for UnsignedTxFactory<C> {
    fn create(&self, raw: &[u8]) -> Result<InterceptedUnsignedTx, ProcessError> {
        let utx: UnsignedTransaction = self.codec.decode(raw)?;
        let hash = self.hasher.compute(raw);
        let sender_shard = self.shard_of(&utx.sender);
        let receiver_shard = self.shard_of(&utx.receiver);
        let me = self.coordinator.self_id();
        Ok(InterceptedUnsignedTx {
            utx,
            hash,
            sender_shard,
            receiver_shard,
            for_current_shard: sender_shard == me || receiver_shard == me,
        })
    }

    fn check_validity(&self, payload: &InterceptedUnsignedTx) -> Result<(), ProcessError> {
        let utx = &payload.utx;
        if utx.receiver.as_bytes().is_empty() {
            return Err(ProcessError::EmptyField("receiver"));
        }
        if utx.original_tx_hash.is_empty() {
            return Err(ProcessError::EmptyField("original_tx_hash"));
        }
        Ok(())
    }
}
