//! Reactive renewal tests
//!
//! A 401 on any authenticated call triggers exactly one token renewal and
//! one replay; a second consecutive 401 is fatal; and a 401 that names
//! UNAUTHORIZED_ENDPOINT never triggers a renewal at all.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stocklink_core::domain::errors::RemoteError;
use stocklink_cloud::inventory;

use crate::common;

fn warehouse_body() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": {
            "code": "ALM-GRAL",
            "description": "General warehouse",
            "active": true
        }
    })
}

#[tokio::test]
async fn single_401_renews_token_and_replays_once() {
    let server = MockServer::start().await;
    // Initial acquisition; the renewal goes through the refresh grant.
    common::mount_client_credentials(&server, "token-1", Some("refresh-1"), 1).await;
    common::mount_refresh_grant(&server, "token-2", 1).await;

    // First call is rejected with a generic 401, the replay succeeds.
    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "token expired"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warehouse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let harness = common::harness(&server);
    let warehouse = inventory::get_warehouse_by_code(&harness.client, "ALM-GRAL")
        .await
        .expect("lookup")
        .expect("warehouse present");

    assert_eq!(warehouse.code, "ALM-GRAL");
}

#[tokio::test]
async fn renewal_without_refresh_token_reauthenticates() {
    let server = MockServer::start().await;
    // No refresh token issued: the renewal falls back to a second
    // client-credentials grant.
    common::mount_client_credentials(&server, "token-1", None, 2).await;

    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(warehouse_body()))
        .expect(1)
        .mount(&server)
        .await;

    let harness = common::harness(&server);
    let warehouse = inventory::get_warehouse_by_code(&harness.client, "ALM-GRAL")
        .await
        .expect("lookup");

    assert!(warehouse.is_some());
}

#[tokio::test]
async fn second_consecutive_401_is_fatal() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", None, 2).await;

    // Both the original request and the replay get 401: exactly two API
    // calls, then a fatal error, never a third attempt.
    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "token expired"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let harness = common::harness(&server);
    let err = inventory::get_warehouse_by_code(&harness.client, "ALM-GRAL")
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::AuthFailed(_)));
}

#[tokio::test]
async fn unauthorized_endpoint_is_surfaced_without_renewal() {
    let server = MockServer::start().await;
    // expect(1): only the initial acquisition; renewing the token cannot
    // fix a missing module, so no renewal may happen.
    common::mount_client_credentials(&server, "token-1", Some("refresh-1"), 1).await;

    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "UNAUTHORIZED_ENDPOINT"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = common::harness(&server);
    let err = inventory::get_warehouse_by_code(&harness.client, "ALM-GRAL")
        .await
        .unwrap_err();

    match err {
        RemoteError::UnauthorizedEndpoint { endpoint } => {
            assert_eq!(endpoint, "/warehouses/ALM-GRAL");
        }
        other => panic!("expected UnauthorizedEndpoint, got {other:?}"),
    }
}

#[tokio::test]
async fn non_auth_errors_are_classified_without_retry() {
    let server = MockServer::start().await;
    common::mount_client_credentials(&server, "token-1", None, 1).await;

    // A 503 is a transient remote failure: classified, never retried here.
    Mock::given(method("GET"))
        .and(path("/warehouses/ALM-GRAL"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "message": "maintenance window"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = common::harness(&server);
    let err = inventory::get_warehouse_by_code(&harness.client, "ALM-GRAL")
        .await
        .unwrap_err();

    match err {
        RemoteError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance window");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
