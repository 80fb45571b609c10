//! The quota flood gate.

use crate::{Quota, QuotaStatusHandler};
use parking_lot::Mutex;
use shardline_core::ProcessError;
use shardline_storage::Cache;
use shardline_types::PeerId;
use std::sync::Arc;

const MIN_MESSAGES: u32 = 1;
const MIN_TOTAL_SIZE: u64 = 1;

/// Budget limits for one gate instance, per reset interval.
#[derive(Debug, Clone, Copy)]
pub struct GateLimits {
    /// Messages one peer may send.
    pub max_messages_per_peer: u32,
    /// Bytes one peer may send.
    pub max_size_per_peer: u64,
    /// Messages the node accepts across all peers.
    pub max_messages: u32,
    /// Bytes the node accepts across all peers.
    pub max_size: u64,
}

impl GateLimits {
    fn validate(&self) -> Result<(), ProcessError> {
        let checks: [(&'static str, u64, u64); 4] = [
            ("max_messages_per_peer", self.max_messages_per_peer as u64, MIN_MESSAGES as u64),
            ("max_size_per_peer", self.max_size_per_peer, MIN_TOTAL_SIZE),
            ("max_messages", self.max_messages as u64, MIN_MESSAGES as u64),
            ("max_size", self.max_size, MIN_TOTAL_SIZE),
        ];
        for (name, provided, minimum) in checks {
            if provided < minimum {
                return Err(ProcessError::InvalidValue {
                    name,
                    provided,
                    minimum,
                });
            }
        }
        Ok(())
    }
}

struct GateState {
    cache: Box<dyn Cache<PeerId, Quota>>,
    global: Quota,
}

/// Charges messages against per-peer and global count/byte budgets.
pub trait FloodLimiter: Send + Sync {
    /// Charge one message of `size` bytes to `peer`. Returns whether the
    /// message is admitted. Does not touch the global counters.
    fn accumulate(&self, peer: &PeerId, size: u64) -> bool;

    /// Like [`accumulate`](Self::accumulate), and additionally records the
    /// message in the global counters. The only entry point that increments
    /// them.
    fn accumulate_global(&self, peer: &PeerId, size: u64) -> bool;

    /// Publish the interval's totals to the status handlers, then clear the
    /// cache and zero the global record.
    fn reset(&self);
}

/// The quota bookkeeper: a bounded per-peer record cache, one global record,
/// and the budget checks, all under one lock.
///
/// Admission rules, in order:
///
/// 1. A message never passes while the global budget is exhausted.
/// 2. A peer's first message of the interval is always admitted and counted
///    as received and processed (even if its size alone exceeds the peer
///    byte budget: the insert path does not re-check).
/// 3. A known peer's received counters are updated first and written back;
///    the budget check follows. Once a peer crosses its budget every later
///    message keeps inflating received counters and keeps being rejected, so
///    rejection is sticky until [`reset`](FloodLimiter::reset).
pub struct FloodGate {
    state: Mutex<GateState>,
    status_handlers: Vec<Arc<dyn QuotaStatusHandler>>,
    limits: GateLimits,
}

impl FloodGate {
    /// Create a gate over a quota cache. All four limits must be ≥ 1.
    pub fn new(
        cache: Box<dyn Cache<PeerId, Quota>>,
        status_handlers: Vec<Arc<dyn QuotaStatusHandler>>,
        limits: GateLimits,
    ) -> Result<Self, ProcessError> {
        limits.validate()?;
        Ok(Self {
            state: Mutex::new(GateState {
                cache,
                global: Quota::default(),
            }),
            status_handlers,
            limits,
        })
    }

    fn charge(&self, state: &mut GateState, peer: &PeerId, size: u64) -> bool {
        let global_exhausted = state.global.received_messages > self.limits.max_messages
            || state.global.received_bytes > self.limits.max_size;
        if global_exhausted {
            return false;
        }

        let Some(mut quota) = state.cache.get(peer) else {
            state.cache.put(peer.clone(), Quota::first(size));
            return true;
        };

        quota.add_received(size);
        let peer_exhausted = quota.received_messages > self.limits.max_messages_per_peer
            || quota.received_bytes > self.limits.max_size_per_peer;
        if peer_exhausted {
            // Write back the received counters only: the record stays over
            // budget, so every later message from this peer is rejected
            // until the next reset.
            state.cache.put(peer.clone(), quota);
            return false;
        }

        quota.add_processed(size);
        state.cache.put(peer.clone(), quota);
        true
    }

    fn publish_statistics(&self, state: &GateState) {
        for handler in &self.status_handlers {
            handler.reset_statistics();
        }
        for peer in state.cache.keys() {
            let Some(quota) = state.cache.get(&peer) else {
                continue;
            };
            for handler in &self.status_handlers {
                handler.add_quota(&peer, &quota);
            }
        }
        for handler in &self.status_handlers {
            handler.set_global_quota(&state.global);
        }
    }
}

impl FloodLimiter for FloodGate {
    fn accumulate(&self, peer: &PeerId, size: u64) -> bool {
        let mut state = self.state.lock();
        self.charge(&mut state, peer, size)
    }

    fn accumulate_global(&self, peer: &PeerId, size: u64) -> bool {
        let mut state = self.state.lock();
        state.global.add_received(size);

        let admitted = self.charge(&mut state, peer, size);
        if admitted {
            state.global.add_processed(size);
        }
        admitted
    }

    fn reset(&self) {
        let mut state = self.state.lock();
        self.publish_statistics(&state);
        state.cache.clear();
        state.global = Quota::default();
    }
}
