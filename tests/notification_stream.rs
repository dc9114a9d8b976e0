//! Integration tests for the notification stream.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use saasboard_entity::UserRole;

#[tokio::test]
async fn test_stream_headers_and_connected_frame() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("alice@test.com", "password123", UserRole::Member);
    let token = app.token_for(&user);

    let mut stream = app
        .open_stream("/api/notifications/stream", Some(&token))
        .await;

    assert_eq!(stream.status, StatusCode::OK);
    assert_eq!(stream.headers["content-type"], "text/event-stream");
    assert_eq!(stream.headers["cache-control"], "no-cache");
    assert_eq!(stream.headers["connection"], "keep-alive");
    assert_eq!(stream.next_event().await, json!({ "type": "connected" }));
    assert_eq!(app.state.registry.sinks_for(user.id).len(), 1);
}

#[tokio::test]
async fn test_stream_accepts_query_token() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("alice@test.com", "password123", UserRole::Member);
    let token = app.token_for(&user);

    let mut stream = app
        .open_stream(&format!("/api/notifications/stream?token={token}"), None)
        .await;

    assert_eq!(stream.status, StatusCode::OK);
    assert_eq!(stream.next_event().await, json!({ "type": "connected" }));
}

#[tokio::test]
async fn test_stream_rejects_missing_or_bad_token() {
    let app = helpers::TestApp::new();

    let missing = app.open_stream("/api/notifications/stream", None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let bad = app
        .open_stream("/api/notifications/stream?token=not-a-jwt", None)
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.registry.connection_count(), 0);
}

#[tokio::test]
async fn test_customer_creation_pushes_to_stream_and_pull_api() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("alice@test.com", "password123", UserRole::Manager);
    let token = app.token_for(&user);

    let mut tab_a = app
        .open_stream("/api/notifications/stream", Some(&token))
        .await;
    assert_eq!(tab_a.next_event().await["type"], "connected");

    let created = app
        .request(
            "POST",
            "/api/customers",
            Some(json!({ "name": "Globex", "email": "ops@globex.test" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let pushed = tab_a.next_event().await;
    assert_eq!(pushed["title"], "New Customer");
    assert_eq!(pushed["message"], "Globex was added as a new customer");
    assert_eq!(pushed["read"], false);
    assert_eq!(pushed["userId"], user.id.to_string());

    // A second client of the same user without a stream sees it by polling.
    let listed = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["unreadCount"], 1);
    assert_eq!(listed.body["notifications"][0]["id"], pushed["id"]);
}

#[tokio::test]
async fn test_every_tab_of_a_user_receives_the_notification() {
    let app = helpers::TestApp::new();
    let alice = app.create_test_user("alice@test.com", "password123", UserRole::Member);
    let bob = app.create_test_user("bob@test.com", "password123", UserRole::Member);
    let alice_token = app.token_for(&alice);
    let bob_token = app.token_for(&bob);

    let mut tab_a = app
        .open_stream("/api/notifications/stream", Some(&alice_token))
        .await;
    let mut tab_b = app
        .open_stream("/api/notifications/stream", Some(&alice_token))
        .await;
    let mut bob_tab = app
        .open_stream("/api/notifications/stream", Some(&bob_token))
        .await;
    for stream in [&mut tab_a, &mut tab_b, &mut bob_tab] {
        assert_eq!(stream.next_event().await["type"], "connected");
    }

    let mock = app
        .request("POST", "/api/notifications/mock", None, Some(&alice_token))
        .await;
    assert_eq!(mock.status, StatusCode::CREATED);

    assert_eq!(tab_a.next_event().await["id"], mock.body["id"]);
    assert_eq!(tab_b.next_event().await["id"], mock.body["id"]);

    // Bob's stream only gets his own notifications.
    let own = app
        .request("POST", "/api/notifications/mock", None, Some(&bob_token))
        .await;
    assert_eq!(bob_tab.next_event().await["id"], own.body["id"]);
}

#[tokio::test]
async fn test_disconnect_unregisters_stream() {
    let app = helpers::TestApp::new();
    let user = app.create_test_user("alice@test.com", "password123", UserRole::Member);
    let token = app.token_for(&user);

    let mut stream = app
        .open_stream("/api/notifications/stream", Some(&token))
        .await;
    stream.next_frame().await;
    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.body["connections"], 1);

    drop(stream);

    assert!(app.state.registry.sinks_for(user.id).is_empty());
    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.body["connections"], 0);

    // Delivery to a user with no open streams still persists the record.
    let mock = app
        .request("POST", "/api/notifications/mock", None, Some(&token))
        .await;
    assert_eq!(mock.status, StatusCode::CREATED);
    let listed = app
        .request("GET", "/api/notifications", None, Some(&token))
        .await;
    assert_eq!(listed.body["unreadCount"], 1);
}
