//! Construction of antiflood components from configuration.
//!
//! Budgets are expressed per interval; a background task resets the gates
//! once per interval so the quotas roll over. The task runs for the lifetime
//! of the node and stops through its cancellation token.

use crate::{
    AntifloodConfig, AntifloodHandler, DisabledAntiflood, FloodGate, FloodLimiter, GateLimits,
    P2pAntiflood, QuotaStatusHandler, TopicFloodGate,
};
use shardline_core::ProcessError;
use shardline_storage::BoundedLruCache;
use shardline_types::PeerId;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Length of one quota interval.
const QUOTA_INTERVAL: Duration = Duration::from_secs(1);

/// A running periodic quota reset loop.
pub struct QuotaResetTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl QuotaResetTask {
    fn spawn(gate: Arc<dyn FloodLimiter>, topic_gate: Arc<TopicFloodGate>) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(QUOTA_INTERVAL) => {
                        gate.reset();
                        topic_gate.reset_all();
                        debug!("quota interval rolled over");
                    }
                }
            }
        });
        Self { token, handle }
    }

    /// Stop the reset loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}

/// An antiflood handler together with its reset task (when enabled).
pub struct AntifloodComponents {
    pub handler: Arc<dyn AntifloodHandler>,
    pub reset_task: Option<QuotaResetTask>,
}

/// Build the inbound antiflood: per-peer and node-global budgets from
/// configuration. Returns the always-admit handler when disabled.
///
/// Must be called from within a tokio runtime when `config.enabled` is true;
/// the reset task is spawned here.
pub fn new_p2p_input_antiflood(
    config: &AntifloodConfig,
    status_handlers: Vec<Arc<dyn QuotaStatusHandler>>,
) -> Result<AntifloodComponents, ProcessError> {
    if !config.enabled {
        return Ok(AntifloodComponents {
            handler: Arc::new(DisabledAntiflood),
            reset_task: None,
        });
    }

    let limits = GateLimits {
        max_messages_per_peer: config.peer_max_input.messages_per_interval,
        max_size_per_peer: config.peer_max_input.total_size_per_interval,
        max_messages: config.network_max_input.messages_per_interval,
        max_size: config.network_max_input.total_size_per_interval,
    };
    build(config, status_handlers, limits)
}

/// Build the outbound antiflood: per-peer budgets only, the global budget is
/// effectively unlimited. Returns the always-admit handler when disabled.
pub fn new_p2p_output_antiflood(
    config: &AntifloodConfig,
) -> Result<AntifloodComponents, ProcessError> {
    if !config.enabled {
        return Ok(AntifloodComponents {
            handler: Arc::new(DisabledAntiflood),
            reset_task: None,
        });
    }

    let limits = GateLimits {
        max_messages_per_peer: config.peer_max_output.messages_per_interval,
        max_size_per_peer: config.peer_max_output.total_size_per_interval,
        max_messages: u32::MAX,
        max_size: u64::MAX,
    };
    build(config, Vec::new(), limits)
}

fn build(
    config: &AntifloodConfig,
    status_handlers: Vec<Arc<dyn QuotaStatusHandler>>,
    limits: GateLimits,
) -> Result<AntifloodComponents, ProcessError> {
    let cache: BoundedLruCache<PeerId, crate::Quota> =
        BoundedLruCache::new(config.cache.capacity);
    let gate: Arc<dyn FloodLimiter> =
        Arc::new(FloodGate::new(Box::new(cache), status_handlers, limits)?);
    let topic_gate = Arc::new(TopicFloodGate::new(config.max_messages_per_topic));

    let reset_task = QuotaResetTask::spawn(Arc::clone(&gate), Arc::clone(&topic_gate));
    let handler = Arc::new(P2pAntiflood::new(gate, topic_gate));

    Ok(AntifloodComponents {
        handler,
        reset_task: Some(reset_task),
    })
}
