//! Access-token refresh behavior.

mod fixtures;

use fixtures::{admin_user, manager_for, seed_session, store_in};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_refresh_replaces_access_token() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let manager = manager_for(&server, &store);
    seed_session(&store, &admin_user());

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_partial_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"token": "access-2"},
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = manager.refresh_session().await.unwrap();

    assert_eq!(token, "access-2");
    assert_eq!(store.access_token().as_deref(), Some("access-2"));
    // Refresh mints an access token only; everything else stays put.
    assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    assert!(store.user().is_some());
}

#[tokio::test]
async fn test_refresh_without_stored_token_purges_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let manager = manager_for(&server, &store);

    // Access token and user but no refresh token.
    store.set_access_token("access-1").unwrap();
    store.set_user(&admin_user()).unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = manager.refresh_session().await.unwrap_err();

    assert_eq!(err.to_string(), "Session refresh failed");
    assert!(store.access_token().is_none());
    assert!(store.user().is_none());
    assert!(!manager.is_authenticated());
}

#[tokio::test]
async fn test_rejected_refresh_purges_session_with_generic_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    let manager = manager_for(&server, &store);
    seed_session(&store, &admin_user());

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"error": "Invalid refresh token"})),
        )
        .mount(&server)
        .await;

    let err = manager.refresh_session().await.unwrap_err();

    // Refresh failures are generic, never verbatim: no partial state and no
    // backend detail survives.
    assert_eq!(err.to_string(), "Session refresh failed");
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
    assert!(store.user().is_none());
}
