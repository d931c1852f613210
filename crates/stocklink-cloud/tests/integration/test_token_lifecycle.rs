//! Token lifecycle tests
//!
//! Verifies the fast path (no network call inside the safety margin),
//! persisted-token adoption across restarts, and the refresh grant with
//! its fall-back to full re-authentication.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn fast_path_authenticates_at_most_once() {
    let server = MockServer::start().await;
    // expect(1): the second bearer_token call must not hit the network.
    common::mount_client_credentials(&server, "token-1", None, 1).await;

    let harness = common::harness(&server);

    let first = harness.tokens.bearer_token().await.expect("first token");
    let second = harness.tokens.bearer_token().await.expect("second token");

    assert_eq!(first, "token-1");
    assert_eq!(second, "token-1");
}

#[tokio::test]
async fn acquired_token_is_persisted_to_the_store() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", Some("refresh-1"), 1).await;

    let harness = common::harness(&server);
    harness.tokens.bearer_token().await.expect("token");

    let persisted = std::fs::read_to_string(&harness.token_file).expect("token file");
    assert!(persisted.contains("token-1"));
    assert!(persisted.contains("refresh-1"));
}

#[tokio::test]
async fn restart_adopts_persisted_token_without_network() {
    let server = MockServer::start().await;
    // expect(0): adopting the persisted token must not touch the endpoint.
    common::mount_client_credentials(&server, "unused", None, 0).await;

    let harness = common::harness(&server);
    common::persist_token(&harness.token_file, "persisted-token", 3600);

    let token = harness.tokens.bearer_token().await.expect("token");
    assert_eq!(token, "persisted-token");
}

#[tokio::test]
async fn expired_persisted_token_triggers_full_authentication() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "fresh-token", None, 1).await;

    let harness = common::harness(&server);
    common::persist_token(&harness.token_file, "stale-token", -60);

    let token = harness.tokens.bearer_token().await.expect("token");
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn near_expiry_persisted_token_is_not_adopted() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "fresh-token", None, 1).await;

    let harness = common::harness(&server);
    // Valid but inside the 5-minute safety margin.
    common::persist_token(&harness.token_file, "nearly-stale", 60);

    let token = harness.tokens.bearer_token().await.expect("token");
    assert_eq!(token, "fresh-token");
}

#[tokio::test]
async fn refresh_access_token_uses_refresh_grant() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", Some("refresh-1"), 1).await;
    common::mount_refresh_grant(&server, "token-2", 1).await;

    let harness = common::harness(&server);
    harness.tokens.bearer_token().await.expect("initial token");

    let refreshed = harness
        .tokens
        .refresh_access_token()
        .await
        .expect("refreshed token");
    assert_eq!(refreshed, "token-2");

    // The renewed token is now the cached one.
    let current = harness.tokens.bearer_token().await.expect("cached token");
    assert_eq!(current, "token-2");
}

#[tokio::test]
async fn refresh_without_refresh_token_fails_non_fatally() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", None, 1).await;

    let harness = common::harness(&server);
    harness.tokens.bearer_token().await.expect("initial token");

    let err = harness.tokens.refresh_access_token().await.unwrap_err();
    assert!(err.to_string().contains("no refresh token"));

    // The cached token is untouched; callers fall back to bearer_token.
    let current = harness.tokens.bearer_token().await.expect("cached token");
    assert_eq!(current, "token-1");
}

#[tokio::test]
async fn force_reacquire_falls_back_when_refresh_grant_is_rejected() {
    let server = MockServer::start().await;

    // Refresh grant not supported by this deployment.
    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "unsupported_grant_type"
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Initial acquisition plus the fall-back re-authentication.
    common::mount_client_credentials(&server, "token-1", Some("refresh-1"), 2).await;

    let harness = common::harness(&server);
    harness.tokens.bearer_token().await.expect("initial token");

    let renewed = harness.tokens.force_reacquire().await.expect("renewed");
    assert_eq!(renewed, "token-1");
}
