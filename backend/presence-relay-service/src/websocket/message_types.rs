use crate::models::message::Message;
use crate::presence::{ConnectionId, Identity};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Inbound WebSocket events from client to server
///
/// Signal payloads are opaque: the relay never inspects SDP or ICE content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsInboundEvent {
    /// Caller sends an SDP offer to `to`
    #[serde(rename = "call-user")]
    CallUser {
        #[serde(alias = "target")]
        to: Identity,
        offer: JsonValue,
    },

    /// Callee answers the offer
    #[serde(rename = "make-answer")]
    MakeAnswer {
        #[serde(alias = "target")]
        to: Identity,
        answer: JsonValue,
    },

    /// Either side trickles an ICE candidate
    #[serde(rename = "ice-candidate")]
    IceCandidate {
        #[serde(alias = "target")]
        to: Identity,
        candidate: JsonValue,
    },
}

/// Outbound WebSocket events from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsOutboundEvent {
    /// First frame on every connection
    #[serde(rename = "your-id")]
    YourId {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },

    /// Full presence set, sent to every live connection after each change
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers {
        #[serde(rename = "onlineUsers")]
        online_users: Vec<Identity>,
    },

    #[serde(rename = "call-made")]
    CallMade { offer: JsonValue, from: Identity },

    #[serde(rename = "answer-made")]
    AnswerMade { answer: JsonValue, from: Identity },

    #[serde(rename = "ice-candidate")]
    IceCandidate { candidate: JsonValue, from: Identity },

    /// A content message was persisted for this recipient
    #[serde(rename = "newMessage")]
    NewMessage { message: Message },
}

impl WsOutboundEvent {
    /// Serialize into a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
