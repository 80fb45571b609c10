//! Antiflood quota enforcement.
//!
//! Every inbound message is charged against two budgets before any other
//! work happens: a per-peer budget and a node-global budget, each counting
//! messages and bytes per interval. The [`FloodGate`] keeps the books, a
//! background task resets them every interval, and [`P2pAntiflood`] exposes
//! the admission decision to the interceptors.
//!
//! Budgets are intentionally lossy with respect to quota-cache evictions: a
//! peer record evicted under cache pressure does not decrement the global
//! counters. The global budget therefore tracks what the node *saw* during
//! the interval, not what the cache currently holds.

mod config;
mod factory;
mod flood_gate;
mod handler;
mod quota;
mod topic_gate;

pub use config::{AntifloodConfig, QuotaLimitConfig};
pub use factory::{
    new_p2p_input_antiflood, new_p2p_output_antiflood, AntifloodComponents, QuotaResetTask,
};
pub use flood_gate::{FloodGate, FloodLimiter, GateLimits};
pub use handler::{AntifloodHandler, DisabledAntiflood, P2pAntiflood};
pub use quota::{Quota, QuotaStatistics, QuotaStatusHandler};
pub use topic_gate::TopicFloodGate;
