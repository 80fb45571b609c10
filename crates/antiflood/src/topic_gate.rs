//! Per-topic message counters.

use dashmap::DashMap;
use shardline_types::PeerId;

/// Counts messages per (topic, peer) pair against per-topic maxima.
///
/// Unlike the byte-aware flood gate this only counts messages: topics have
/// very different payload sizes, so byte budgets stay a per-peer concern.
/// Counters are cleared per topic by the same periodic reset that clears the
/// flood gate.
pub struct TopicFloodGate {
    counters: DashMap<(String, PeerId), u32>,
    topic_maxima: DashMap<String, u32>,
    default_max_messages: u32,
}

impl TopicFloodGate {
    pub fn new(default_max_messages: u32) -> Self {
        Self {
            counters: DashMap::new(),
            topic_maxima: DashMap::new(),
            default_max_messages,
        }
    }

    /// Charge `num_messages` on `topic` to `peer`. Returns whether the
    /// topic budget still holds. Counters keep growing past the budget, so
    /// rejection holds until the topic is reset.
    pub fn increase_load(&self, peer: &PeerId, topic: &str, num_messages: u32) -> bool {
        let max = self.max_for_topic(topic);
        let mut counter = self
            .counters
            .entry((topic.to_string(), peer.clone()))
            .or_insert(0);
        *counter = counter.saturating_add(num_messages);
        *counter <= max
    }

    /// Override the message budget for one topic.
    pub fn set_max_messages_for_topic(&self, topic: &str, max_messages: u32) {
        self.topic_maxima.insert(topic.to_string(), max_messages);
    }

    /// Clear every peer's counter on `topic`.
    pub fn reset_for_topic(&self, topic: &str) {
        self.counters.retain(|(t, _), _| t != topic);
    }

    /// Clear every counter on every topic. Called at each interval
    /// rollover.
    pub fn reset_all(&self) {
        self.counters.clear();
    }

    fn max_for_topic(&self, topic: &str) -> u32 {
        self.topic_maxima
            .get(topic)
            .map(|entry| *entry.value())
            .unwrap_or(self.default_max_messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let gate = TopicFloodGate::new(2);
        let peer = PeerId::from("p");
        assert!(gate.increase_load(&peer, "headers", 1));
        assert!(gate.increase_load(&peer, "headers", 1));
        assert!(!gate.increase_load(&peer, "headers", 1));
        // Other topics have their own counters.
        assert!(gate.increase_load(&peer, "bodies", 1));
    }

    #[test]
    fn test_topic_override_and_reset() {
        let gate = TopicFloodGate::new(1);
        gate.set_max_messages_for_topic("headers", 3);
        let peer = PeerId::from("p");
        assert!(gate.increase_load(&peer, "headers", 3));
        assert!(!gate.increase_load(&peer, "headers", 1));

        gate.reset_for_topic("headers");
        assert!(gate.increase_load(&peer, "headers", 1));
    }

    #[test]
    fn test_reset_only_clears_named_topic() {
        let gate = TopicFloodGate::new(1);
        let peer = PeerId::from("p");
        assert!(gate.increase_load(&peer, "a", 1));
        assert!(gate.increase_load(&peer, "b", 1));
        gate.reset_for_topic("a");
        assert!(gate.increase_load(&peer, "a", 1));
        assert!(!gate.increase_load(&peer, "b", 1));
    }
}
