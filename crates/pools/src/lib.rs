//! Sharded data pools and the stale-transaction cleaner.
//!
//! Pools are external collaborators: topic-keyed caches partitioned by
//! shard-pair, with change observers. This crate defines the seam
//! ([`ShardedPool`], [`PoolsHolder`]), the tagged value the transaction
//! pools store ([`PoolValue`]), and the [`TxPoolCleaner`] that bounds how
//! many rounds an unprocessed transaction may linger in a pool.

mod cleaner;
mod pool;
mod shard_pair;

pub use cleaner::{CleanerConfig, TxPoolCleaner};
pub use pool::{HeaderPoolValue, PoolObserver, PoolValue, PoolsHolder, ShardedPool};
pub use shard_pair::shard_pair_id;
