use awc::Client;
use serde_json::{json, Value};

use super::support::{connect_as, next_json, start_server, trusted_state};

#[actix_rt::test]
async fn rest_send_pushes_to_online_recipient() {
    let state = trusted_state();
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    let mut bob = connect_as(addr, "bob").await;
    next_json(&mut bob).await;
    next_json(&mut bob).await;

    let client = Client::new();
    let mut resp = client
        .post(format!("http://{addr}/api/messages/send/bob?userId=alice"))
        .send_json(&json!({ "text": "are you there?" }))
        .await
        .expect("send message");
    assert_eq!(resp.status().as_u16(), 201);
    let created: Value = resp.json().await.expect("created body");

    let pushed = next_json(&mut bob).await;
    assert_eq!(pushed["type"], "newMessage");
    assert_eq!(pushed["message"]["id"], created["id"]);
    assert_eq!(pushed["message"]["text"], "are you there?");
    assert_eq!(pushed["message"]["senderId"], "alice");

    let mut resp = client
        .get(format!("http://{addr}/api/messages/alice?userId=bob"))
        .send()
        .await
        .expect("fetch history");
    assert_eq!(resp.status().as_u16(), 200);
    let history: Value = resp.json().await.expect("history body");
    assert_eq!(history.as_array().map(Vec::len), Some(1));

    let mut resp = client
        .get(format!("http://{addr}/api/presence?userId=alice"))
        .send()
        .await
        .expect("fetch presence");
    let presence: Value = resp.json().await.expect("presence body");
    assert_eq!(presence["onlineUsers"], json!(["bob"]));

    handle.stop(true).await;
}

#[actix_rt::test]
async fn offline_recipient_gets_history_only() {
    let state = trusted_state();
    let (addr, handle) = start_server(state).await.expect("start server");

    let client = Client::new();
    let resp = client
        .post(format!("http://{addr}/api/messages/send/carol?userId=alice"))
        .send_json(&json!({ "image": "https://cdn.example.com/cat.png" }))
        .await
        .expect("send message");
    assert_eq!(resp.status().as_u16(), 201);

    let mut carol = connect_as(addr, "carol").await;
    assert_eq!(next_json(&mut carol).await["type"], "your-id");
    assert_eq!(next_json(&mut carol).await["type"], "getOnlineUsers");

    let mut resp = client
        .get(format!("http://{addr}/api/messages/alice?userId=carol"))
        .send()
        .await
        .expect("fetch history");
    let history: Value = resp.json().await.expect("history body");
    assert_eq!(history[0]["image"], "https://cdn.example.com/cat.png");

    handle.stop(true).await;
}
