use std::sync::Arc;

use awc::{error::WsClientError, Client};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use presence_relay_service::auth::{Claims, JwtAuthenticator};

use super::support::{next_json, online_users, start_server, state_with};

const SECRET: &str = "integration-secret";

fn token_for(sub: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

#[actix_rt::test]
async fn unauthenticated_upgrade_is_rejected() {
    let state = state_with(Arc::new(JwtAuthenticator::new(SECRET)));
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    let result = Client::new()
        .ws(format!("http://{addr}/ws?userId=alice"))
        .connect()
        .await;
    match result {
        Err(WsClientError::InvalidResponseStatus(status)) => assert_eq!(status.as_u16(), 401),
        Err(other) => panic!("unexpected error: {other:?}"),
        Ok(_) => panic!("upgrade should have been rejected"),
    }
    assert_eq!(state.registry.bound_count(), 0);

    handle.stop(true).await;
}

#[actix_rt::test]
async fn token_identity_is_bound() {
    let state = state_with(Arc::new(JwtAuthenticator::new(SECRET)));
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    // The token decides the identity, not the userId parameter.
    let (_resp, mut connection) = Client::new()
        .ws(format!("http://{addr}/ws?userId=mallory&token={}", token_for("alice")))
        .connect()
        .await
        .expect("connect websocket client");

    assert_eq!(next_json(&mut connection).await["type"], "your-id");
    assert_eq!(online_users(&next_json(&mut connection).await), vec!["alice"]);

    handle.stop(true).await;
}
