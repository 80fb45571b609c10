//! Quota records and statistics sinks.

use parking_lot::Mutex;
use shardline_types::PeerId;
use std::collections::HashMap;

/// Message and byte counters for one peer (or for the whole node).
///
/// Invariant: received counters never lag processed counters; a message is
/// only processed after it was received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quota {
    /// Messages observed.
    pub received_messages: u32,
    /// Bytes observed.
    pub received_bytes: u64,
    /// Messages admitted past the budget check.
    pub processed_messages: u32,
    /// Bytes admitted past the budget check.
    pub processed_bytes: u64,
}

impl Quota {
    /// The record inserted for a peer's first message in an interval:
    /// one message of `size` bytes, received and processed.
    pub fn first(size: u64) -> Self {
        Self {
            received_messages: 1,
            received_bytes: size,
            processed_messages: 1,
            processed_bytes: size,
        }
    }

    /// Record an observed message.
    pub fn add_received(&mut self, size: u64) {
        self.received_messages += 1;
        self.received_bytes += size;
    }

    /// Record an admitted message.
    pub fn add_processed(&mut self, size: u64) {
        self.processed_messages += 1;
        self.processed_bytes += size;
    }
}

/// Sink notified with quota totals when the flood gate resets.
pub trait QuotaStatusHandler: Send + Sync {
    /// Called first: the previous interval's statistics are about to be
    /// replaced.
    fn reset_statistics(&self);

    /// One call per peer still present in the quota cache.
    fn add_quota(&self, peer: &PeerId, quota: &Quota);

    /// The node-global totals for the interval.
    fn set_global_quota(&self, quota: &Quota);
}

#[derive(Debug, Default)]
struct StatisticsInner {
    peers: HashMap<PeerId, Quota>,
    global: Quota,
}

/// A [`QuotaStatusHandler`] that keeps the last interval's totals readable.
#[derive(Debug, Default)]
pub struct QuotaStatistics {
    inner: Mutex<StatisticsInner>,
}

impl QuotaStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals recorded for `peer` in the last completed interval.
    pub fn peer_quota(&self, peer: &PeerId) -> Option<Quota> {
        self.inner.lock().peers.get(peer).copied()
    }

    /// Node-global totals for the last completed interval.
    pub fn global_quota(&self) -> Quota {
        self.inner.lock().global
    }

    /// Number of peers seen in the last completed interval.
    pub fn num_peers(&self) -> usize {
        self.inner.lock().peers.len()
    }
}

impl QuotaStatusHandler for QuotaStatistics {
    fn reset_statistics(&self) {
        let mut inner = self.inner.lock();
        inner.peers.clear();
        inner.global = Quota::default();
    }

    fn add_quota(&self, peer: &PeerId, quota: &Quota) {
        self.inner.lock().peers.insert(peer.clone(), *quota);
    }

    fn set_global_quota(&self, quota: &Quota) {
        self.inner.lock().global = *quota;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_quota() {
        let q = Quota::first(42);
        assert_eq!(q.received_messages, 1);
        assert_eq!(q.received_bytes, 42);
        assert_eq!(q.processed_messages, 1);
        assert_eq!(q.processed_bytes, 42);
    }

    #[test]
    fn test_statistics_collects_and_resets() {
        let stats = QuotaStatistics::new();
        let peer = PeerId::from("p1");

        stats.add_quota(&peer, &Quota::first(10));
        stats.set_global_quota(&Quota::first(10));
        assert_eq!(stats.num_peers(), 1);
        assert_eq!(stats.peer_quota(&peer).unwrap().received_bytes, 10);
        assert_eq!(stats.global_quota().received_messages, 1);

        stats.reset_statistics();
        assert_eq!(stats.num_peers(), 0);
        assert_eq!(stats.global_quota(), Quota::default());
    }
}
