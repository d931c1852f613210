//! Shared test helpers for remote API integration tests
//!
//! Provides wiremock-based setup for the OAuth2 token endpoint and the
//! inventory API, plus a harness bundling a TokenManager and ApiClient
//! pointed at the mock server with a temp-file token store.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stocklink_cloud::auth::{FileTokenStore, OAuthConfig, TokenManager};
use stocklink_cloud::client::ApiClient;
use stocklink_cloud::provider::CloudInventoryProvider;
use stocklink_core::ports::token_store::{AccessToken, ITokenStore};

pub const TOKEN_PATH: &str = "/oauth/token";

/// Everything a test needs, with the temp dir kept alive for its duration.
pub struct Harness {
    pub tokens: Arc<TokenManager>,
    pub client: ApiClient,
    pub token_file: std::path::PathBuf,
    _token_dir: TempDir,
}

impl Harness {
    pub fn provider(self) -> (CloudInventoryProvider, std::path::PathBuf, TempDir) {
        let Harness {
            tokens,
            client,
            token_file,
            _token_dir,
        } = self;
        (
            CloudInventoryProvider::new(client, tokens),
            token_file,
            _token_dir,
        )
    }
}

/// Builds a TokenManager + ApiClient against the given mock server.
pub fn harness(server: &MockServer) -> Harness {
    let token_dir = tempfile::tempdir().expect("tempdir");
    let token_file = token_dir.path().join("token.json");
    let store = Arc::new(FileTokenStore::new(token_file.clone()));

    let config = OAuthConfig {
        token_url: format!("{}{}", server.uri(), TOKEN_PATH),
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
    };

    let tokens = Arc::new(TokenManager::new(&config, store).expect("token manager"));
    let client = ApiClient::new(server.uri(), Duration::from_secs(5), tokens.clone())
        .expect("api client");

    Harness {
        tokens,
        client,
        token_file,
        _token_dir: token_dir,
    }
}

/// A successful token endpoint response.
pub fn token_body(access_token: &str, refresh_token: Option<&str>) -> ResponseTemplate {
    let mut body = serde_json::json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 7200,
    });
    if let Some(refresh) = refresh_token {
        body["refresh_token"] = serde_json::json!(refresh);
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// Mounts the client-credentials grant, expecting exactly `expect` calls.
pub async fn mount_client_credentials(
    server: &MockServer,
    access_token: &str,
    refresh_token: Option<&str>,
    expect: u64,
) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(token_body(access_token, refresh_token))
        .expect(expect)
        .mount(server)
        .await;
}

/// Mounts the refresh grant, expecting exactly `expect` calls.
pub async fn mount_refresh_grant(
    server: &MockServer,
    access_token: &str,
    expect: u64,
) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(token_body(access_token, None))
        .expect(expect)
        .mount(server)
        .await;
}

/// Writes a pre-existing token record into the harness's token file.
pub fn persist_token(token_file: &std::path::Path, access_token: &str, expires_in_secs: i64) {
    let store = FileTokenStore::new(token_file);
    let now = Utc::now();
    store
        .save(&AccessToken {
            access_token: access_token.to_string(),
            refresh_token: None,
            obtained_at: now,
            expires_at: now + chrono::Duration::seconds(expires_in_secs),
        })
        .expect("persist token");
}
