use crate::presence::{ConnectionHandle, Identity, PresenceBroadcaster};
use crate::relay::SignalRelay;
use crate::state::AppState;
use crate::websocket::message_types::{WsInboundEvent, WsOutboundEvent};
use actix::{Actor, ActorContext, AsyncContext, StreamHandler};
use actix_web_actors::ws;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// One authenticated WebSocket connection.
///
/// Everything written to the socket goes through the connection's outbound
/// channel, so the identity frame, presence snapshots, relayed signals and
/// message pushes reach the client in the order they were produced.
pub struct WsSession {
    identity: Identity,
    handle: ConnectionHandle,
    outbound: Option<UnboundedReceiver<String>>,
    broadcaster: Arc<PresenceBroadcaster>,
    relay: SignalRelay,
    heartbeat_interval: Duration,
    client_timeout: Duration,
    hb: Instant,
}

impl WsSession {
    pub fn new(identity: Identity, state: &AppState) -> Self {
        let (handle, outbound) = ConnectionHandle::channel();
        Self {
            identity,
            handle,
            outbound: Some(outbound),
            broadcaster: state.broadcaster.clone(),
            relay: state.relay.clone(),
            heartbeat_interval: state.config.websocket.heartbeat_interval,
            client_timeout: state.config.websocket.client_timeout,
            hb: Instant::now(),
        }
    }

    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        let timeout = self.client_timeout;
        ctx.run_interval(self.heartbeat_interval, move |act, ctx| {
            if Instant::now().duration_since(act.hb) > timeout {
                tracing::warn!(
                    identity = %act.identity,
                    connection_id = %act.handle.id(),
                    "WebSocket heartbeat failed, disconnecting"
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn dispatch(&self, event: WsInboundEvent) {
        match event {
            WsInboundEvent::CallUser { to, offer } => {
                self.relay.forward_offer(&self.identity, &to, offer);
            }
            WsInboundEvent::MakeAnswer { to, answer } => {
                self.relay.forward_answer(&self.identity, &to, answer);
            }
            WsInboundEvent::IceCandidate { to, candidate } => {
                self.relay.forward_candidate(&self.identity, &to, candidate);
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let connection_id = self.handle.id();
        tracing::info!(
            identity = %self.identity,
            connection_id = %connection_id,
            "WebSocket session started"
        );

        self.hb(ctx);

        if let Some(outbound) = self.outbound.take() {
            ctx.add_stream(UnboundedReceiverStream::new(outbound));
        }

        match (WsOutboundEvent::YourId { connection_id }).to_frame() {
            Ok(frame) => {
                self.handle.send(frame);
            }
            Err(e) => tracing::error!(error = %e, "failed to serialize connection id frame"),
        }

        self.broadcaster
            .connect(self.identity.clone(), self.handle.clone());
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        let released = self.broadcaster.disconnect(self.handle.id());
        tracing::info!(
            identity = %self.identity,
            connection_id = %self.handle.id(),
            released = released.is_some(),
            "WebSocket session stopped"
        );
    }
}

// Outbound frames queued by the broadcaster, relay and notifier
impl StreamHandler<String> for WsSession {
    fn handle(&mut self, frame: String, ctx: &mut Self::Context) {
        ctx.text(frame);
    }

    // The session holds a sender itself, so the stream only ends on teardown.
    fn finished(&mut self, _ctx: &mut Self::Context) {}
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.hb = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Text(text)) => match serde_json::from_str::<WsInboundEvent>(&text) {
                Ok(event) => self.dispatch(event),
                Err(e) => {
                    tracing::warn!(identity = %self.identity, error = %e, "Failed to parse WS message");
                }
            },
            Ok(ws::Message::Binary(_)) => {
                tracing::warn!(identity = %self.identity, "Binary WebSocket messages not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                tracing::debug!(identity = %self.identity, ?reason, "WebSocket close received");
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(e) => {
                tracing::warn!(identity = %self.identity, error = %e, "WebSocket protocol error");
                ctx.stop();
            }
        }
    }
}
