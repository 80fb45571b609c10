//! In-memory transport.

use dashmap::DashMap;
use parking_lot::Mutex;
use shardline_core::ProcessError;
use shardline_network::{InboundMessage, MessageProcessor, Messenger, NetworkError};
use shardline_types::PeerId;
use std::sync::Arc;

/// Messenger that routes delivered messages straight into the registered
/// processor on the caller's thread.
#[derive(Default)]
pub struct InMemoryMessenger {
    processors: DashMap<String, Arc<dyn MessageProcessor>>,
    created_topics: Mutex<Vec<String>>,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topics created so far, in creation order.
    pub fn created_topics(&self) -> Vec<String> {
        self.created_topics.lock().clone()
    }

    /// Number of topics with a registered processor.
    pub fn num_processors(&self) -> usize {
        self.processors.len()
    }

    /// Deliver a payload on `topic` as if published by `peer`.
    pub fn deliver(
        &self,
        topic: &str,
        data: Vec<u8>,
        peer: PeerId,
    ) -> Result<(), ProcessError> {
        let processor = self
            .processors
            .get(topic)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| panic!("no processor registered for topic {topic}"));
        processor.process_received_message(&InboundMessage {
            topic: topic.to_string(),
            data,
            peer,
        })
    }
}

impl Messenger for InMemoryMessenger {
    fn create_topic(&self, name: &str) -> Result<(), NetworkError> {
        let mut topics = self.created_topics.lock();
        if !topics.iter().any(|t| t == name) {
            topics.push(name.to_string());
        }
        Ok(())
    }

    fn register_message_processor(
        &self,
        topic: &str,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<(), NetworkError> {
        if !self.created_topics.lock().iter().any(|t| t == topic) {
            return Err(NetworkError::UnknownTopic(topic.to_string()));
        }
        if self.processors.contains_key(topic) {
            return Err(NetworkError::ProcessorAlreadyRegistered(topic.to_string()));
        }
        self.processors.insert(topic.to_string(), processor);
        Ok(())
    }
}
