use serde_json::json;

use super::support::{
    close, connect_as, next_json, online_users, send_json, start_server, trusted_state, wait_until,
};

#[actix_rt::test]
async fn late_close_of_superseded_socket_keeps_new_binding() {
    let state = trusted_state();
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    let mut first = connect_as(addr, "alice").await;
    next_json(&mut first).await;
    assert_eq!(online_users(&next_json(&mut first).await), vec!["alice"]);

    let mut second = connect_as(addr, "alice").await;
    let second_id = next_json(&mut second).await;
    assert_eq!(online_users(&next_json(&mut second).await), vec!["alice"]);
    assert_eq!(online_users(&next_json(&mut first).await), vec!["alice"]);

    // The stale socket goes away after the reconnect.
    close(&mut first).await;
    wait_until(|| state.broadcaster.live_count() == 1).await;

    let resolved = state.registry.resolve(&"alice".into()).expect("alice still bound");
    assert_eq!(resolved.id().to_string(), second_id["connectionId"]);

    let mut bob = connect_as(addr, "bob").await;
    next_json(&mut bob).await;
    assert_eq!(online_users(&next_json(&mut bob).await), vec!["alice", "bob"]);

    // No "alice went offline" snapshot was sent; bob's arrival is next.
    assert_eq!(online_users(&next_json(&mut second).await), vec!["alice", "bob"]);

    send_json(&mut bob, json!({ "type": "call-user", "to": "alice", "offer": { "sdp": "b" } })).await;
    let call = next_json(&mut second).await;
    assert_eq!(call["type"], "call-made");
    assert_eq!(call["from"], "bob");

    handle.stop(true).await;
}
