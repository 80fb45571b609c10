//! The per-topic interception pipeline.

use crate::intercepted::{InterceptedPayload, PayloadFactory};
use crate::sinks::PayloadSink;
use shardline_antiflood::AntifloodHandler;
use shardline_core::{Blacklist, JobThrottler, ProcessError};
use shardline_network::{InboundMessage, MessageProcessor};
use std::sync::Arc;
use tracing::{trace, warn};

/// Validates one topic's inbound payloads and forwards the survivors to
/// their pool.
///
/// The pipeline per message: antiflood admission, a concurrency slot,
/// decode + hash, blacklist, structural validation, then the sink. Every
/// failure drops the message where it stands; nothing is retried and no
/// error escapes past the transport handler.
pub struct DataInterceptor<T: InterceptedPayload> {
    topic: String,
    factory: Arc<dyn PayloadFactory<T>>,
    sink: Arc<dyn PayloadSink<T>>,
    throttler: Arc<JobThrottler>,
    antiflood: Arc<dyn AntifloodHandler>,
    blacklist: Arc<dyn Blacklist>,
}

impl<T: InterceptedPayload> DataInterceptor<T> {
    pub fn new(
        topic: String,
        factory: Arc<dyn PayloadFactory<T>>,
        sink: Arc<dyn PayloadSink<T>>,
        throttler: Arc<JobThrottler>,
        antiflood: Arc<dyn AntifloodHandler>,
        blacklist: Arc<dyn Blacklist>,
    ) -> Self {
        Self {
            topic,
            factory,
            sink,
            throttler,
            antiflood,
            blacklist,
        }
    }

    /// The topic this interceptor is subscribed to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn intercept(&self, message: &InboundMessage) -> Result<T, ProcessError> {
        let payload = self.factory.create(&message.data)?;
        let hash = payload.hash();
        if self.blacklist.has(hash.as_ref()) {
            return Err(ProcessError::Blacklisted {
                hash_hex: hash.to_hex(),
            });
        }
        self.factory.check_validity(&payload)?;
        Ok(payload)
    }
}

impl<T: InterceptedPayload> MessageProcessor for DataInterceptor<T> {
    fn process_received_message(&self, message: &InboundMessage) -> Result<(), ProcessError> {
        if let Err(e) = self.antiflood.can_process_message(message, &message.peer) {
            trace!(topic = %self.topic, peer = %message.peer, "message not admitted");
            return Err(e);
        }

        if !self.throttler.start_processing() {
            trace!(topic = %self.topic, peer = %message.peer, "interception slots saturated");
            return Err(ProcessError::NoSlotAvailable);
        }
        let checked = self.intercept(message);
        self.throttler.end_processing();

        let payload = match checked {
            Ok(payload) => payload,
            Err(e) => {
                warn!(topic = %self.topic, peer = %message.peer, error = %e,
                    "message dropped");
                return Err(e);
            }
        };

        if !payload.is_for_current_shard() {
            trace!(topic = %self.topic, hash = %payload.hash(),
                payload_type = payload.payload_type(), "payload for another shard, skipped");
            return Ok(());
        }

        self.sink.save(&payload)
    }
}
