//! Working in-memory pools.

use dashmap::DashMap;
use parking_lot::RwLock;
use shardline_pools::{HeaderPoolValue, PoolObserver, PoolValue, PoolsHolder, ShardedPool};
use shardline_storage::{BoundedLruCache, Cache};
use shardline_types::{BlockBody, Hash, TrieNodePayload};
use std::sync::Arc;

/// In-memory [`ShardedPool`]: sub-caches created on demand, observers fired
/// on every add.
pub struct InMemoryShardedPool {
    stores: DashMap<String, Arc<dyn Cache<Hash, PoolValue>>>,
    observers: RwLock<Vec<PoolObserver>>,
    store_capacity: usize,
}

impl InMemoryShardedPool {
    pub fn new(store_capacity: usize) -> Self {
        Self {
            stores: DashMap::new(),
            observers: RwLock::new(Vec::new()),
            store_capacity,
        }
    }

    fn store_for(&self, shard_pair_id: &str) -> Arc<dyn Cache<Hash, PoolValue>> {
        Arc::clone(
            self.stores
                .entry(shard_pair_id.to_string())
                .or_insert_with(|| {
                    Arc::new(BoundedLruCache::<Hash, PoolValue>::new(self.store_capacity))
                })
                .value(),
        )
    }
}

impl ShardedPool for InMemoryShardedPool {
    fn register_observer(&self, observer: PoolObserver) {
        self.observers.write().push(observer);
    }

    fn shard_store(&self, shard_pair_id: &str) -> Option<Arc<dyn Cache<Hash, PoolValue>>> {
        self.stores
            .get(shard_pair_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn add(&self, key: Hash, value: PoolValue, shard_pair_id: &str) {
        self.store_for(shard_pair_id).put(key, value.clone());
        let observers = self.observers.read();
        for observer in observers.iter() {
            observer(&key, &value);
        }
    }
}

/// All pools the pipeline writes to, in memory.
pub struct InMemoryPoolsHolder {
    transactions: Arc<InMemoryShardedPool>,
    reward_transactions: Arc<InMemoryShardedPool>,
    unsigned_transactions: Arc<InMemoryShardedPool>,
    headers: Arc<BoundedLruCache<Hash, HeaderPoolValue>>,
    miniblocks: Arc<BoundedLruCache<Hash, BlockBody>>,
    trie_nodes: Arc<BoundedLruCache<Hash, TrieNodePayload>>,
}

impl InMemoryPoolsHolder {
    pub fn new(capacity: usize) -> Self {
        Self {
            transactions: Arc::new(InMemoryShardedPool::new(capacity)),
            reward_transactions: Arc::new(InMemoryShardedPool::new(capacity)),
            unsigned_transactions: Arc::new(InMemoryShardedPool::new(capacity)),
            headers: Arc::new(BoundedLruCache::new(capacity)),
            miniblocks: Arc::new(BoundedLruCache::new(capacity)),
            trie_nodes: Arc::new(BoundedLruCache::new(capacity)),
        }
    }
}

impl Default for InMemoryPoolsHolder {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl PoolsHolder for InMemoryPoolsHolder {
    fn transactions(&self) -> Arc<dyn ShardedPool> {
        Arc::clone(&self.transactions) as Arc<dyn ShardedPool>
    }

    fn reward_transactions(&self) -> Arc<dyn ShardedPool> {
        Arc::clone(&self.reward_transactions) as Arc<dyn ShardedPool>
    }

    fn unsigned_transactions(&self) -> Arc<dyn ShardedPool> {
        Arc::clone(&self.unsigned_transactions) as Arc<dyn ShardedPool>
    }

    fn headers(&self) -> Arc<dyn Cache<Hash, HeaderPoolValue>> {
        Arc::clone(&self.headers) as Arc<dyn Cache<Hash, HeaderPoolValue>>
    }

    fn miniblocks(&self) -> Arc<dyn Cache<Hash, BlockBody>> {
        Arc::clone(&self.miniblocks) as Arc<dyn Cache<Hash, BlockBody>>
    }

    fn trie_nodes(&self) -> Arc<dyn Cache<Hash, TrieNodePayload>> {
        Arc::clone(&self.trie_nodes) as Arc<dyn Cache<Hash, TrieNodePayload>>
    }
}
