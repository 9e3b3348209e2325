//! Identity-addressed forwarding of WebRTC negotiation signals.
//!
//! The relay has no notion of a call: it does not track outstanding offers,
//! does not check that an answer follows an offer, and does not check whether
//! the sender is allowed to reach the target. It resolves the target through
//! the registry and hands the payload over untouched.

use crate::metrics;
use crate::presence::{ConnectionRegistry, Identity};
use crate::websocket::message_types::WsOutboundEvent;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::Candidate => "candidate",
        }
    }

    fn into_event(self, payload: JsonValue, from: Identity) -> WsOutboundEvent {
        match self {
            Self::Offer => WsOutboundEvent::CallMade {
                offer: payload,
                from,
            },
            Self::Answer => WsOutboundEvent::AnswerMade {
                answer: payload,
                from,
            },
            Self::Candidate => WsOutboundEvent::IceCandidate {
                candidate: payload,
                from,
            },
        }
    }
}

/// Result of a forward attempt. Senders are never told about failures on the
/// wire; the value exists for logging, metrics and callers that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered,
    /// Target identity is not bound; the signal was dropped.
    TargetOffline,
    /// Target resolved but its socket is already gone.
    TransportClosed,
}

impl RelayOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::TargetOffline => "target_offline",
            Self::TransportClosed => "transport_closed",
        }
    }
}

/// Stateless forwarder; reads the registry, never writes it.
#[derive(Clone)]
pub struct SignalRelay {
    registry: ConnectionRegistry,
}

impl SignalRelay {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    pub fn forward_offer(
        &self,
        from: &Identity,
        target: &Identity,
        offer: JsonValue,
    ) -> RelayOutcome {
        self.forward(SignalKind::Offer, from, target, offer)
    }

    pub fn forward_answer(
        &self,
        from: &Identity,
        target: &Identity,
        answer: JsonValue,
    ) -> RelayOutcome {
        self.forward(SignalKind::Answer, from, target, answer)
    }

    pub fn forward_candidate(
        &self,
        from: &Identity,
        target: &Identity,
        candidate: JsonValue,
    ) -> RelayOutcome {
        self.forward(SignalKind::Candidate, from, target, candidate)
    }

    /// Deliver `{payload, from}` to the connection currently bound to `target`.
    pub fn forward(
        &self,
        kind: SignalKind,
        from: &Identity,
        target: &Identity,
        payload: JsonValue,
    ) -> RelayOutcome {
        let outcome = match self.registry.resolve(target) {
            None => RelayOutcome::TargetOffline,
            Some(handle) => match kind.into_event(payload, from.clone()).to_frame() {
                Ok(frame) => {
                    if handle.send(frame) {
                        RelayOutcome::Delivered
                    } else {
                        RelayOutcome::TransportClosed
                    }
                }
                Err(e) => {
                    warn!(kind = kind.as_str(), error = %e, "failed to serialize signal");
                    RelayOutcome::TransportClosed
                }
            },
        };

        metrics::record_signal(kind.as_str(), outcome.as_str());
        debug!(
            kind = kind.as_str(),
            from = %from,
            target = %target,
            outcome = outcome.as_str(),
            "relayed signal"
        );
        outcome
    }
}
