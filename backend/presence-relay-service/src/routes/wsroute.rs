use crate::auth::Handshake;
use crate::state::AppState;
use crate::websocket::WsSession;
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;

/// Authenticate the handshake, then upgrade. Rejected callers get a 401 and
/// never reach the registry.
#[get("/ws")]
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let handshake = Handshake::from_request(&req);

    let identity = match state.authenticator.authenticate(&handshake).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(
                peer = ?req.peer_addr(),
                error = %e,
                "WebSocket connection rejected"
            );
            return Err(e.into());
        }
    };

    tracing::debug!(identity = %identity, "WebSocket handshake authenticated");
    ws::start(WsSession::new(identity, &state), &req, stream)
}
