//! Transport seam for the Shardline node.
//!
//! The pipeline never talks to a concrete transport: it registers
//! [`MessageProcessor`]s on a [`Messenger`] and receives
//! [`InboundMessage`]s with the publishing peer's identity. Production
//! wiring adapts the real gossip layer to this trait; tests use the
//! in-memory messenger from `shardline-test-helpers`.

mod messenger;
pub mod topics;

pub use messenger::{InboundMessage, MessageProcessor, Messenger, NetworkError};
