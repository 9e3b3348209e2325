use serde_json::json;

use super::support::{
    close, connect_as, next_json, online_users, send_json, start_server, trusted_state, wait_until,
};

#[actix_rt::test]
async fn alice_calls_bob_end_to_end() {
    let state = trusted_state();
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    let mut alice = connect_as(addr, "alice").await;
    let hello = next_json(&mut alice).await;
    assert_eq!(hello["type"], "your-id");
    assert!(hello["connectionId"].is_string());
    assert_eq!(online_users(&next_json(&mut alice).await), vec!["alice"]);

    let mut bob = connect_as(addr, "bob").await;
    assert_eq!(next_json(&mut bob).await["type"], "your-id");
    assert_eq!(online_users(&next_json(&mut bob).await), vec!["alice", "bob"]);
    assert_eq!(online_users(&next_json(&mut alice).await), vec!["alice", "bob"]);

    let offer = json!({ "type": "offer", "sdp": "v=0 alice" });
    send_json(&mut alice, json!({ "type": "call-user", "to": "bob", "offer": offer })).await;
    let call = next_json(&mut bob).await;
    assert_eq!(call["type"], "call-made");
    assert_eq!(call["from"], "alice");
    assert_eq!(call["offer"], offer);

    let answer = json!({ "type": "answer", "sdp": "v=0 bob" });
    send_json(&mut bob, json!({ "type": "make-answer", "to": "alice", "answer": answer })).await;
    let answered = next_json(&mut alice).await;
    assert_eq!(answered["type"], "answer-made");
    assert_eq!(answered["from"], "bob");
    assert_eq!(answered["answer"], answer);

    // `target` is accepted as an alias for `to`
    let candidate = json!({ "candidate": "candidate:1 1 udp 2122260223 10.0.0.1 54321 typ host" });
    send_json(
        &mut alice,
        json!({ "type": "ice-candidate", "target": "bob", "candidate": candidate }),
    )
    .await;
    let trickled = next_json(&mut bob).await;
    assert_eq!(trickled["type"], "ice-candidate");
    assert_eq!(trickled["from"], "alice");
    assert_eq!(trickled["candidate"], candidate);

    close(&mut alice).await;
    assert_eq!(online_users(&next_json(&mut bob).await), vec!["bob"]);
    wait_until(|| state.broadcaster.live_count() == 1).await;

    // alice is gone: the offer is dropped and nothing comes back to bob.
    send_json(
        &mut bob,
        json!({ "type": "call-user", "to": "alice", "offer": { "sdp": "v=0 late" } }),
    )
    .await;

    // A signal bob addresses to himself is the next and only frame he sees.
    send_json(
        &mut bob,
        json!({ "type": "ice-candidate", "to": "bob", "candidate": { "candidate": "self" } }),
    )
    .await;
    let echoed = next_json(&mut bob).await;
    assert_eq!(echoed["type"], "ice-candidate");
    assert_eq!(echoed["from"], "bob");
    assert_eq!(echoed["candidate"], json!({ "candidate": "self" }));
    assert!(state.registry.resolve(&"alice".into()).is_none());

    handle.stop(true).await;
}

#[actix_rt::test]
async fn signal_to_offline_identity_is_dropped() {
    let state = trusted_state();
    let (addr, handle) = start_server(state.clone()).await.expect("start server");

    let mut alice = connect_as(addr, "alice").await;
    next_json(&mut alice).await;
    next_json(&mut alice).await;

    send_json(
        &mut alice,
        json!({ "type": "call-user", "to": "nobody", "offer": { "sdp": "x" } }),
    )
    .await;
    // Garbage is ignored and the socket stays usable.
    send_json(&mut alice, json!({ "type": "dance" })).await;

    let mut bob = connect_as(addr, "bob").await;
    next_json(&mut bob).await;
    next_json(&mut bob).await;

    // The next thing alice sees is bob coming online, nothing else.
    assert_eq!(online_users(&next_json(&mut alice).await), vec!["alice", "bob"]);

    handle.stop(true).await;
}
