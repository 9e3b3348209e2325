//! Real-time channel: wire event types and the per-socket session actor.

pub mod message_types;
pub mod session;

pub use message_types::{WsInboundEvent, WsOutboundEvent};
pub use session::WsSession;
