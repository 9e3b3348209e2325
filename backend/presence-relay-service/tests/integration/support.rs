use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use actix_web::{dev::ServerHandle, web, App, HttpServer};
use awc::error::WsProtocolError;
use awc::{ws, Client};
use futures::{Sink, SinkExt, Stream, StreamExt};
use presence_relay_service::auth::{ConnectionAuthenticator, TrustedQueryAuthenticator};
use presence_relay_service::config::Config;
use presence_relay_service::routes;
use presence_relay_service::state::AppState;
use presence_relay_service::storage::InMemoryMessageStore;
use serde_json::Value;

pub fn trusted_state() -> AppState {
    state_with(Arc::new(TrustedQueryAuthenticator))
}

pub fn state_with(authenticator: Arc<dyn ConnectionAuthenticator>) -> AppState {
    AppState::new(
        Arc::new(Config::test_defaults()),
        Arc::new(InMemoryMessageStore::new()),
        authenticator,
    )
}

pub async fn start_server(state: AppState) -> std::io::Result<(SocketAddr, ServerHandle)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_rt::spawn(server);
    Ok((addr, handle))
}

pub async fn connect_as(
    addr: SocketAddr,
    user: &str,
) -> impl Stream<Item = Result<ws::Frame, WsProtocolError>>
       + Sink<ws::Message, Error = WsProtocolError>
       + Unpin {
    let (_resp, connection) = Client::new()
        .ws(format!("http://{addr}/ws?userId={user}"))
        .connect()
        .await
        .expect("connect websocket client");
    connection
}

/// Next text frame as JSON, skipping heartbeat pings.
pub async fn next_json<S>(connection: &mut S) -> Value
where
    S: Stream<Item = Result<ws::Frame, WsProtocolError>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), connection.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("frame data");
        match frame {
            ws::Frame::Text(bytes) => {
                return serde_json::from_slice(&bytes).expect("text frame is JSON");
            }
            ws::Frame::Ping(_) | ws::Frame::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

pub async fn send_json<S>(connection: &mut S, value: Value)
where
    S: Sink<ws::Message, Error = WsProtocolError> + Unpin,
{
    connection
        .send(ws::Message::Text(value.to_string().into()))
        .await
        .expect("send frame");
}

pub async fn close<S>(connection: &mut S)
where
    S: Sink<ws::Message, Error = WsProtocolError> + Unpin,
{
    connection
        .send(ws::Message::Close(None))
        .await
        .expect("send close");
}

/// Poll until `condition` holds; the server tears sessions down asynchronously.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..100 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached in time");
}

pub fn online_users(frame: &Value) -> Vec<String> {
    assert_eq!(frame["type"], "getOnlineUsers", "frame: {frame}");
    frame["onlineUsers"]
        .as_array()
        .expect("onlineUsers array")
        .iter()
        .map(|v| v.as_str().expect("identity string").to_string())
        .collect()
}
