//! Messenger trait and inbound message shape.

use shardline_core::ProcessError;
use shardline_types::PeerId;
use std::sync::Arc;
use thiserror::Error;

/// Errors from topic registration on the transport.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    #[error("topic already has a registered processor: {0}")]
    ProcessorAlreadyRegistered(String),

    #[error("topic does not exist: {0}")]
    UnknownTopic(String),
}

/// A message delivered by the transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Topic the message was published on.
    pub topic: String,
    /// Raw payload bytes.
    pub data: Vec<u8>,
    /// Identity of the publishing peer.
    pub peer: PeerId,
}

impl InboundMessage {
    /// Payload size in bytes, as charged against antiflood budgets.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Handles messages delivered on one topic.
///
/// Handlers are called from the transport's delivery threads. Data-plane
/// failures are returned for the transport's trace logs and otherwise
/// dropped; they must never panic.
pub trait MessageProcessor: Send + Sync {
    fn process_received_message(&self, message: &InboundMessage) -> Result<(), ProcessError>;
}

/// Publish/subscribe transport with per-topic processor registration.
pub trait Messenger: Send + Sync {
    /// Ensure a topic exists on the transport.
    fn create_topic(&self, name: &str) -> Result<(), NetworkError>;

    /// Register the processor receiving messages published on `topic`.
    fn register_message_processor(
        &self,
        topic: &str,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<(), NetworkError>;
}
