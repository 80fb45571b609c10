//! Pool sinks: where validated payloads land.

use crate::intercepted::{
    InterceptedBlockBody, InterceptedHeader, InterceptedMetaHeader, InterceptedPayload,
    InterceptedRewardTx, InterceptedTransaction, InterceptedTrieNode, InterceptedUnsignedTx,
};
use shardline_core::ProcessError;
use shardline_pools::{shard_pair_id, HeaderPoolValue, PoolValue, ShardedPool};
use shardline_storage::Cache;
use shardline_types::{BlockBody, Hash, RoutedTransaction, ShardId, TrieNodePayload};
use std::sync::Arc;
use tracing::trace;

/// Stores one payload family into its pool.
pub trait PayloadSink<T: InterceptedPayload>: Send + Sync {
    fn save(&self, payload: &T) -> Result<(), ProcessError>;
}

/// Sink for user transactions: the sharded block-transaction pool.
pub struct TxPoolSink {
    pool: Arc<dyn ShardedPool>,
}

impl TxPoolSink {
    pub fn new(pool: Arc<dyn ShardedPool>) -> Self {
        Self { pool }
    }
}

impl PayloadSink<InterceptedTransaction> for TxPoolSink {
    fn save(&self, payload: &InterceptedTransaction) -> Result<(), ProcessError> {
        let routed = RoutedTransaction {
            tx: payload.tx.clone(),
            sender_shard: payload.sender_shard,
            receiver_shard: payload.receiver_shard,
        };
        let pair = shard_pair_id(payload.sender_shard, payload.receiver_shard);
        trace!(hash = %payload.hash(), pair = %pair, "transaction pooled");
        self.pool.add(payload.hash(), PoolValue::Block(routed), &pair);
        Ok(())
    }
}

/// Sink for reward transactions: metachain -> receiver shard.
pub struct RewardTxPoolSink {
    pool: Arc<dyn ShardedPool>,
}

impl RewardTxPoolSink {
    pub fn new(pool: Arc<dyn ShardedPool>) -> Self {
        Self { pool }
    }
}

impl PayloadSink<InterceptedRewardTx> for RewardTxPoolSink {
    fn save(&self, payload: &InterceptedRewardTx) -> Result<(), ProcessError> {
        let pair = shard_pair_id(ShardId::METACHAIN, payload.receiver_shard);
        self.pool
            .add(payload.hash(), PoolValue::Reward(payload.rtx.clone()), &pair);
        Ok(())
    }
}

/// Sink for smart-contract results.
pub struct UnsignedTxPoolSink {
    pool: Arc<dyn ShardedPool>,
}

impl UnsignedTxPoolSink {
    pub fn new(pool: Arc<dyn ShardedPool>) -> Self {
        Self { pool }
    }
}

impl PayloadSink<InterceptedUnsignedTx> for UnsignedTxPoolSink {
    fn save(&self, payload: &InterceptedUnsignedTx) -> Result<(), ProcessError> {
        let pair = shard_pair_id(payload.sender_shard, payload.receiver_shard);
        self.pool
            .add(payload.hash(), PoolValue::Unsigned(payload.utx.clone()), &pair);
        Ok(())
    }
}

/// Sink for both header flavors: the headers cache.
pub struct HeaderPoolSink {
    cache: Arc<dyn Cache<Hash, HeaderPoolValue>>,
}

impl HeaderPoolSink {
    pub fn new(cache: Arc<dyn Cache<Hash, HeaderPoolValue>>) -> Self {
        Self { cache }
    }
}

impl PayloadSink<InterceptedHeader> for HeaderPoolSink {
    fn save(&self, payload: &InterceptedHeader) -> Result<(), ProcessError> {
        self.cache
            .put(payload.hash(), HeaderPoolValue::Shard(payload.header.clone()));
        Ok(())
    }
}

impl PayloadSink<InterceptedMetaHeader> for HeaderPoolSink {
    fn save(&self, payload: &InterceptedMetaHeader) -> Result<(), ProcessError> {
        self.cache
            .put(payload.hash(), HeaderPoolValue::Meta(payload.header.clone()));
        Ok(())
    }
}

/// Sink for block bodies.
pub struct MiniblocksPoolSink {
    cache: Arc<dyn Cache<Hash, BlockBody>>,
}

impl MiniblocksPoolSink {
    pub fn new(cache: Arc<dyn Cache<Hash, BlockBody>>) -> Self {
        Self { cache }
    }
}

impl PayloadSink<InterceptedBlockBody> for MiniblocksPoolSink {
    fn save(&self, payload: &InterceptedBlockBody) -> Result<(), ProcessError> {
        self.cache.put(payload.hash(), payload.body.clone());
        Ok(())
    }
}

/// Sink for trie nodes.
pub struct TrieNodePoolSink {
    cache: Arc<dyn Cache<Hash, TrieNodePayload>>,
}

impl TrieNodePoolSink {
    pub fn new(cache: Arc<dyn Cache<Hash, TrieNodePayload>>) -> Self {
        Self { cache }
    }
}

impl PayloadSink<InterceptedTrieNode> for TrieNodePoolSink {
    fn save(&self, payload: &InterceptedTrieNode) -> Result<(), ProcessError> {
        self.cache.put(payload.hash(), payload.node.clone());
        Ok(())
    }
}
