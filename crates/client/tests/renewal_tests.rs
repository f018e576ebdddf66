//! Integration tests for the credential renewal path
//!
//! Covers the single renewal-and-replay cycle: a 401 triggers exactly one
//! renewal call, the replayed request carries the renewed credential, and a
//! failed renewal clears the session and signals the expiry hook.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use pledge_client::{ClientError, MemorySessionStore, PledgeClient, SessionStore, TokenPair};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stored(access: &str, refresh: &str) -> Arc<MemorySessionStore> {
    let store = Arc::new(MemorySessionStore::new());
    store.set(TokenPair {
        access: access.into(),
        refresh: refresh.into(),
    });
    store
}

/// Mounts the renewal endpoint: accepts `refresh`, returns `access`.
async fn mount_renewal(server: &MockServer, refresh: &str, access: &str, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/jwt/refresh/"))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": access })))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_renewal_replays_request_with_new_credential() {
    let mock_server = MockServer::start().await;

    // Replay with the renewed credential succeeds; anything else is rejected
    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .with_priority(2)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_renewal(&mock_server, "R1", "A2", 1).await;

    let store = stored("A1", "R1");
    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();

    let campaigns = client.my_campaigns().await.unwrap();
    assert!(campaigns.is_empty());

    // Access rotated, refresh untouched
    assert_eq!(
        store.get(),
        Some(TokenPair {
            access: "A2".into(),
            refresh: "R1".into()
        })
    );

    // The renewal call itself goes out without a bearer credential
    let requests = mock_server.received_requests().await.unwrap();
    let renewal = requests
        .iter()
        .find(|request| request.url.path() == "/api/auth/jwt/refresh/")
        .unwrap();
    assert!(renewal.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_second_401_is_surfaced_without_another_renewal() {
    let mock_server = MockServer::start().await;

    // The endpoint rejects even the renewed credential
    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("still unauthorized"))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_renewal(&mock_server, "R1", "A2", 1).await;

    let store = stored("A1", "R1");
    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();

    let result = client.my_campaigns().await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));

    // A post-replay 401 is not a renewal failure: the session stays stored
    assert_eq!(
        store.get(),
        Some(TokenPair {
            access: "A2".into(),
            refresh: "R1".into()
        })
    );
}

#[tokio::test]
async fn test_failed_renewal_clears_session_and_fires_hook() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/jwt/refresh/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("refresh token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = stored("Aold", "Rexpired");
    let expired = Arc::new(AtomicUsize::new(0));
    let expired_hook = expired.clone();

    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(store.clone())
        .on_session_expired(move || {
            expired_hook.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let result = client.my_campaigns().await;

    // The caller observes the rejected renewal, not the original 401
    assert!(matches!(result, Err(ClientError::SessionExpired(_))));
    assert!(store.get().is_none());
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_401_without_stored_refresh_is_terminal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("credentials required"))
        .expect(1)
        .mount(&mock_server)
        .await;
    // No renewal call may go out without a refresh credential
    Mock::given(method("POST"))
        .and(path("/api/auth/jwt/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let expired = Arc::new(AtomicUsize::new(0));
    let expired_hook = expired.clone();

    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(Arc::new(MemorySessionStore::new()))
        .on_session_expired(move || {
            expired_hook.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let result = client.my_campaigns().await;
    assert!(matches!(result, Err(ClientError::SessionExpired(_))));
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_network_failure_during_renewal_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&mock_server)
        .await;
    // A renewal endpoint outage is handled like any other renewal rejection
    Mock::given(method("POST"))
        .and(path("/api/auth/jwt/refresh/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = stored("A1", "R1");
    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();

    let result = client.my_campaigns().await;
    assert!(matches!(result, Err(ClientError::SessionExpired(_))));
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_concurrent_401s_share_a_single_renewal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/campaigns/mine/"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .with_priority(2)
        .mount(&mock_server)
        .await;
    mount_renewal(&mock_server, "R1", "A2", 1).await;

    let store = stored("A1", "R1");
    let client = PledgeClient::builder()
        .base_url(mock_server.uri())
        .session_store(store.clone())
        .build()
        .unwrap();

    let (first, second) = tokio::join!(client.my_campaigns(), client.my_campaigns());
    assert!(first.is_ok());
    assert!(second.is_ok());

    assert_eq!(
        store.get(),
        Some(TokenPair {
            access: "A2".into(),
            refresh: "R1".into()
        })
    );
}
