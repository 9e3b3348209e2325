use crate::metrics;
use crate::models::Message;
use crate::presence::ConnectionRegistry;
use crate::websocket::message_types::WsOutboundEvent;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Pushed,
    /// Recipient not bound; history fetch is the only way they get it.
    RecipientOffline,
    TransportClosed,
}

impl DeliveryOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pushed => "pushed",
            Self::RecipientOffline => "recipient_offline",
            Self::TransportClosed => "transport_closed",
        }
    }
}

/// Best-effort, at-most-once push of persisted messages.
///
/// Must only be handed messages that the store has already acknowledged.
/// Nothing is queued or retried.
#[derive(Clone)]
pub struct DeliveryNotifier {
    registry: ConnectionRegistry,
}

impl DeliveryNotifier {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    pub fn notify(&self, message: &Message) -> DeliveryOutcome {
        let outcome = match self.registry.resolve(&message.receiver_id) {
            None => DeliveryOutcome::RecipientOffline,
            Some(handle) => {
                let event = WsOutboundEvent::NewMessage {
                    message: message.clone(),
                };
                match event.to_frame() {
                    Ok(frame) => {
                        if handle.send(frame) {
                            DeliveryOutcome::Pushed
                        } else {
                            DeliveryOutcome::TransportClosed
                        }
                    }
                    Err(e) => {
                        warn!(message_id = %message.id, error = %e, "failed to serialize message push");
                        DeliveryOutcome::TransportClosed
                    }
                }
            }
        };

        metrics::record_message_push(outcome.as_str());
        debug!(
            message_id = %message.id,
            recipient = %message.receiver_id,
            outcome = outcome.as_str(),
            "message push"
        );
        outcome
    }
}
