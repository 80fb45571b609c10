//! Stale-transaction cleaner.
//!
//! Transactions reach the pools through gossip, but only a subset is ever
//! selected into a block. The cleaner tracks the arrival round of every
//! pooled transaction and evicts entries that outlive the configured number
//! of rounds, across the three transaction flavors.

use crate::{shard_pair_id, PoolValue, PoolsHolder, ShardedPool};
use parking_lot::Mutex;
use serde::Deserialize;
use shardline_core::{ProcessError, RoundClock, ShardCoordinator};
use shardline_storage::Cache;
use shardline_types::{Address, Hash, RoundIndex, ShardId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Cleaner configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CleanerConfig {
    /// Seconds between reaper passes.
    #[serde(default = "default_sleep_interval_secs")]
    pub sleep_interval_secs: u64,

    /// Rounds a pooled transaction may stay unprocessed before eviction.
    #[serde(default = "default_max_rounds_to_keep")]
    pub max_rounds_to_keep: i64,
}

fn default_sleep_interval_secs() -> u64 {
    60
}

fn default_max_rounds_to_keep() -> i64 {
    100
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            sleep_interval_secs: default_sleep_interval_secs(),
            max_rounds_to_keep: default_max_rounds_to_keep(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxFlavor {
    Block,
    Reward,
    Unsigned,
}

impl fmt::Display for TxFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TxFlavor::Block => "block",
            TxFlavor::Reward => "reward",
            TxFlavor::Unsigned => "unsigned",
        };
        write!(f, "{name}")
    }
}

struct PendingTx {
    arrival_round: RoundIndex,
    sender_shard: ShardId,
    receiver_shard: ShardId,
    flavor: TxFlavor,
    store: Arc<dyn Cache<Hash, PoolValue>>,
}

struct CleanerState {
    pending: Mutex<HashMap<Hash, PendingTx>>,
    round_clock: Arc<dyn RoundClock>,
    coordinator: Arc<dyn ShardCoordinator>,
    max_rounds_to_keep: i64,
}

impl CleanerState {
    /// Track a pool arrival. First observation wins; later observations of
    /// the same hash keep the original arrival round.
    fn on_received(
        &self,
        key: &Hash,
        sender_shard: ShardId,
        receiver_shard: ShardId,
        flavor: TxFlavor,
        pool: &Arc<dyn ShardedPool>,
    ) {
        let mut pending = self.pending.lock();
        if pending.contains_key(key) {
            return;
        }

        let Some(store) = pool.shard_store(&shard_pair_id(sender_shard, receiver_shard)) else {
            return;
        };

        let arrival_round = self.round_clock.index();
        pending.insert(
            *key,
            PendingTx {
                arrival_round,
                sender_shard,
                receiver_shard,
                flavor,
                store,
            },
        );
        trace!(hash = %key, round = arrival_round, sender = %sender_shard,
            receiver = %receiver_shard, flavor = %flavor, "tracking pooled transaction");
    }

    /// One reaper pass. Returns the residual pending-map size.
    fn clean_pass(&self) -> usize {
        let current_round = self.round_clock.index();
        let mut cleaned = 0usize;

        let mut pending = self.pending.lock();
        pending.retain(|hash, info| {
            if !info.store.contains(hash) {
                trace!(hash = %hash, flavor = %info.flavor,
                    "transaction left the pool, dropping record");
                return false;
            }

            let round_diff = current_round - info.arrival_round;
            if round_diff <= self.max_rounds_to_keep {
                return true;
            }

            info.store.remove(hash);
            cleaned += 1;
            trace!(hash = %hash, round = info.arrival_round, round_diff,
                sender = %info.sender_shard, receiver = %info.receiver_shard,
                flavor = %info.flavor, "evicted stale transaction");
            false
        });

        if cleaned > 0 {
            debug!(cleaned, "stale transactions evicted");
        }
        pending.len()
    }

    fn shard_of(&self, address: &Address) -> ShardId {
        if address.is_empty() {
            self.coordinator.self_id()
        } else {
            self.coordinator.compute_id(address)
        }
    }
}

/// Background reaper bounding the staleness of pooled transactions.
///
/// Construct-and-forget: observers are registered on the three transaction
/// pools at construction and the reaper loop runs until [`shutdown`]
/// (or the end of the process).
///
/// [`shutdown`]: TxPoolCleaner::shutdown
pub struct TxPoolCleaner {
    state: Arc<CleanerState>,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl TxPoolCleaner {
    /// Register pool observers and spawn the reaper loop.
    ///
    /// Must be called from within a tokio runtime. `max_rounds_to_keep`
    /// must be ≥ 1.
    pub fn spawn(
        pools: &dyn PoolsHolder,
        round_clock: Arc<dyn RoundClock>,
        coordinator: Arc<dyn ShardCoordinator>,
        config: CleanerConfig,
    ) -> Result<Self, ProcessError> {
        if config.max_rounds_to_keep < 1 {
            return Err(ProcessError::InvalidValue {
                name: "max_rounds_to_keep",
                provided: config.max_rounds_to_keep.max(0) as u64,
                minimum: 1,
            });
        }

        let state = Arc::new(CleanerState {
            pending: Mutex::new(HashMap::new()),
            round_clock,
            coordinator,
            max_rounds_to_keep: config.max_rounds_to_keep,
        });

        Self::observe_block_txs(&state, pools.transactions());
        Self::observe_reward_txs(&state, pools.reward_transactions());
        Self::observe_unsigned_txs(&state, pools.unsigned_transactions());

        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_state = Arc::clone(&state);
        let interval = Duration::from_secs(config.sleep_interval_secs);
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        let residual = task_state.clean_pass();
                        debug!(pending = residual, "reaper pass finished");
                    }
                }
            }
        });

        Ok(Self {
            state,
            token,
            handle,
        })
    }

    fn observe_block_txs(state: &Arc<CleanerState>, pool: Arc<dyn ShardedPool>) {
        let state = Arc::clone(state);
        let observed = Arc::clone(&pool);
        pool.register_observer(Arc::new(move |key: &Hash, value: &PoolValue| {
            let PoolValue::Block(routed) = value else {
                warn!(hash = %key, error = %ProcessError::WrongTypeAssertion,
                    "unexpected value in block-transaction pool");
                return;
            };
            state.on_received(
                key,
                routed.sender_shard,
                routed.receiver_shard,
                TxFlavor::Block,
                &observed,
            );
        }));
    }

    fn observe_reward_txs(state: &Arc<CleanerState>, pool: Arc<dyn ShardedPool>) {
        let state = Arc::clone(state);
        let observed = Arc::clone(&pool);
        pool.register_observer(Arc::new(move |key: &Hash, _value: &PoolValue| {
            // Rewards always travel metachain -> self shard.
            let receiver = state.coordinator.self_id();
            state.on_received(key, ShardId::METACHAIN, receiver, TxFlavor::Reward, &observed);
        }));
    }

    fn observe_unsigned_txs(state: &Arc<CleanerState>, pool: Arc<dyn ShardedPool>) {
        let state = Arc::clone(state);
        let observed = Arc::clone(&pool);
        pool.register_observer(Arc::new(move |key: &Hash, value: &PoolValue| {
            let PoolValue::Unsigned(utx) = value else {
                warn!(hash = %key, error = %ProcessError::WrongTypeAssertion,
                    "unexpected value in unsigned-transaction pool");
                return;
            };
            let sender = state.shard_of(&utx.sender);
            let receiver = state.shard_of(&utx.receiver);
            state.on_received(key, sender, receiver, TxFlavor::Unsigned, &observed);
        }));
    }

    /// Run one reaper pass now, returning the residual pending-map size.
    /// The background loop does this on its own schedule; tests drive it
    /// directly.
    pub fn clean_pass(&self) -> usize {
        self.state.clean_pass()
    }

    /// Number of transactions currently tracked.
    pub fn num_pending(&self) -> usize {
        self.state.pending.lock().len()
    }

    /// Stop the reaper loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}
