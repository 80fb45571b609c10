//! Admission decision exposed to the interceptors.

use crate::{FloodLimiter, TopicFloodGate};
use shardline_core::ProcessError;
use shardline_network::InboundMessage;
use shardline_types::PeerId;
use std::sync::Arc;
use tracing::trace;

/// Gate every inbound message must pass before any other work happens.
pub trait AntifloodHandler: Send + Sync {
    /// Charge `message` to `peer`'s budget and the global budget.
    fn can_process_message(
        &self,
        message: &InboundMessage,
        peer: &PeerId,
    ) -> Result<(), ProcessError>;

    /// Charge `num_messages` on `topic` to `peer`'s topic budget.
    ///
    /// `total_size` is accepted for interface stability; topic budgets count
    /// messages only.
    fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        total_size: u64,
    ) -> Result<(), ProcessError>;
}

/// Production [`AntifloodHandler`]: a flood gate for count/byte budgets plus
/// a topic gate for per-topic message counts.
pub struct P2pAntiflood {
    flood_gate: Arc<dyn FloodLimiter>,
    topic_gate: Arc<TopicFloodGate>,
}

impl P2pAntiflood {
    pub fn new(flood_gate: Arc<dyn FloodLimiter>, topic_gate: Arc<TopicFloodGate>) -> Self {
        Self {
            flood_gate,
            topic_gate,
        }
    }
}

impl AntifloodHandler for P2pAntiflood {
    fn can_process_message(
        &self,
        message: &InboundMessage,
        peer: &PeerId,
    ) -> Result<(), ProcessError> {
        let admitted = self.flood_gate.accumulate_global(peer, message.len() as u64);
        if !admitted {
            trace!(peer = %peer, topic = %message.topic, size = message.len(),
                "message rejected by flood gate");
            return Err(ProcessError::SystemBusy { peer: peer.clone() });
        }
        Ok(())
    }

    fn can_process_messages_on_topic(
        &self,
        peer: &PeerId,
        topic: &str,
        num_messages: u32,
        _total_size: u64,
    ) -> Result<(), ProcessError> {
        let admitted = self.topic_gate.increase_load(peer, topic, num_messages);
        if !admitted {
            trace!(peer = %peer, topic, num_messages, "topic budget exceeded");
            return Err(ProcessError::TopicBudgetExceeded {
                peer: peer.clone(),
                topic: topic.to_string(),
            });
        }
        Ok(())
    }
}

/// The always-admit handler used when antiflood is disabled by
/// configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAntiflood;

impl AntifloodHandler for DisabledAntiflood {
    fn can_process_message(
        &self,
        _message: &InboundMessage,
        _peer: &PeerId,
    ) -> Result<(), ProcessError> {
        Ok(())
    }

    fn can_process_messages_on_topic(
        &self,
        _peer: &PeerId,
        _topic: &str,
        _num_messages: u32,
        _total_size: u64,
    ) -> Result<(), ProcessError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FloodGate, GateLimits};
    use shardline_storage::BoundedLruCache;

    fn message(peer: &PeerId, size: usize) -> InboundMessage {
        InboundMessage {
            topic: "transactions_0".to_string(),
            data: vec![0u8; size],
            peer: peer.clone(),
        }
    }

    fn handler(max_messages_per_peer: u32) -> P2pAntiflood {
        let gate = FloodGate::new(
            Box::new(BoundedLruCache::new(16)),
            Vec::new(),
            GateLimits {
                max_messages_per_peer,
                max_size_per_peer: 1 << 20,
                max_messages: u32::MAX,
                max_size: u64::MAX,
            },
        )
        .unwrap();
        P2pAntiflood::new(Arc::new(gate), Arc::new(TopicFloodGate::new(4)))
    }

    #[test]
    fn test_admission_then_rejection() {
        let handler = handler(2);
        let peer = PeerId::from("p");
        let msg = message(&peer, 16);

        assert!(handler.can_process_message(&msg, &peer).is_ok());
        assert!(handler.can_process_message(&msg, &peer).is_ok());
        let err = handler.can_process_message(&msg, &peer).unwrap_err();
        assert_eq!(err, ProcessError::SystemBusy { peer: peer.clone() });
    }

    #[test]
    fn test_topic_budget() {
        let handler = handler(100);
        let peer = PeerId::from("p");
        assert!(handler
            .can_process_messages_on_topic(&peer, "headers", 4, 0)
            .is_ok());
        let err = handler
            .can_process_messages_on_topic(&peer, "headers", 1, 0)
            .unwrap_err();
        assert!(matches!(err, ProcessError::TopicBudgetExceeded { .. }));
    }

    #[test]
    fn test_disabled_always_admits() {
        let handler = DisabledAntiflood;
        let peer = PeerId::from("p");
        for _ in 0..1000 {
            assert!(handler.can_process_message(&message(&peer, 1 << 16), &peer).is_ok());
            assert!(handler
                .can_process_messages_on_topic(&peer, "t", 1000, 1 << 30)
                .is_ok());
        }
    }
}
