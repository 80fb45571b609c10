//! Pool seams and stored value shapes.

use shardline_storage::Cache;
use shardline_types::{
    BlockBody, Hash, MetaHeader, RewardTransaction, RoutedTransaction, ShardHeader,
    TrieNodePayload, UnsignedTransaction,
};
use std::sync::Arc;

/// Value stored in the three transaction pools.
///
/// Each pool holds exactly one variant; the tag replaces the dynamic type
/// assertions a pool consumer would otherwise need, and a mismatched tag is
/// a programming error on the writer's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolValue {
    /// A user transaction with its resolved shard route.
    Block(RoutedTransaction),
    /// A protocol reward payout.
    Reward(RewardTransaction),
    /// A smart-contract result.
    Unsigned(UnsignedTransaction),
}

/// Value stored in the headers pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPoolValue {
    Shard(ShardHeader),
    Meta(MetaHeader),
}

/// Callback invoked after a value lands in a sharded pool.
pub type PoolObserver = Arc<dyn Fn(&Hash, &PoolValue) + Send + Sync>;

/// A topic-keyed cache partitioned by shard pair, with change observers.
///
/// `shard_pair_id` keys follow [`crate::shard_pair_id`]. Observers fire on
/// every successful [`add`](Self::add); each observer invocation runs on the
/// caller's thread.
pub trait ShardedPool: Send + Sync {
    /// Register a change observer.
    fn register_observer(&self, observer: PoolObserver);

    /// The sub-cache for one shard pair, when it exists.
    fn shard_store(&self, shard_pair_id: &str) -> Option<Arc<dyn Cache<Hash, PoolValue>>>;

    /// Store a value in the sub-cache for `shard_pair_id` and notify
    /// observers.
    fn add(&self, key: Hash, value: PoolValue, shard_pair_id: &str);
}

/// The full set of pools the ingestion pipeline writes into.
pub trait PoolsHolder: Send + Sync {
    /// User transactions, routed by shard pair.
    fn transactions(&self) -> Arc<dyn ShardedPool>;

    /// Reward transactions, arriving from the metachain.
    fn reward_transactions(&self) -> Arc<dyn ShardedPool>;

    /// Smart-contract results, routed by shard pair.
    fn unsigned_transactions(&self) -> Arc<dyn ShardedPool>;

    /// Shard and metachain headers.
    fn headers(&self) -> Arc<dyn Cache<Hash, HeaderPoolValue>>;

    /// Transaction block bodies.
    fn miniblocks(&self) -> Arc<dyn Cache<Hash, BlockBody>>;

    /// State-trie nodes.
    fn trie_nodes(&self) -> Arc<dyn Cache<Hash, TrieNodePayload>>;
}
