//! OAuth2 client-credentials token lifecycle
//!
//! The integration authenticates as itself (client-credentials grant, HTTP
//! Basic client authentication), so there is no interactive flow: one token
//! per deployment, acquired on demand, cached in memory and on disk, renewed
//! proactively inside a safety margin and reactively after a 401.
//!
//! ## Components
//!
//! - [`OAuthConfig`] - Token endpoint and client credentials
//! - [`ClientCredentialsFlow`] - The grant exchanges via the `oauth2` crate
//! - [`FileTokenStore`] - JSON-file implementation of the token store port
//! - [`TokenManager`] - Owns the cached token and its whole lifecycle

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use oauth2::{
    basic::{BasicClient, BasicTokenResponse},
    AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken, TokenResponse,
    TokenUrl,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use stocklink_core::domain::errors::RemoteError;
use stocklink_core::ports::token_store::{AccessToken, ITokenStore};

/// Tokens with less remaining lifetime than this are renewed before use
const EXPIRY_MARGIN_MINUTES: i64 = 5;

/// Assumed lifetime when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 7200;

// ============================================================================
// OAuthConfig
// ============================================================================

/// Configuration for the client-credentials grant
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth2 token endpoint URL
    pub token_url: String,
    /// Client id of the integration
    pub client_id: String,
    /// Client secret of the integration
    pub client_secret: String,
}

// ============================================================================
// ClientCredentialsFlow
// ============================================================================

/// OAuth2 grant exchanges using the `oauth2` crate
///
/// Handles the client-credentials grant and the refresh-token grant. The
/// client id/secret pair is sent as HTTP Basic authentication, as the
/// remote token endpoint requires.
pub struct ClientCredentialsFlow {
    client: BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>,
}

impl ClientCredentialsFlow {
    /// Creates a new flow from the given configuration
    pub fn new(config: &OAuthConfig) -> Result<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_type(AuthType::BasicAuth)
            .set_token_uri(TokenUrl::new(config.token_url.clone()).context("Invalid token URL")?);

        Ok(Self { client })
    }

    /// Performs the client-credentials grant and returns a fresh token
    pub async fn request_token(&self, http_client: &reqwest::Client) -> Result<AccessToken> {
        let token_result = self
            .client
            .exchange_client_credentials()
            .request_async(http_client)
            .await
            .context("Client-credentials grant failed")?;

        Ok(Self::into_access_token(token_result, None))
    }

    /// Exchanges a refresh token for a new access token
    ///
    /// When the response carries no new refresh token, the old one is kept
    /// so later renewals can still use the refresh grant.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
        http_client: &reqwest::Client,
    ) -> Result<AccessToken> {
        let token_result = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(http_client)
            .await
            .context("Refresh-token grant failed")?;

        Ok(Self::into_access_token(
            token_result,
            Some(refresh_token.to_string()),
        ))
    }

    fn into_access_token(
        token_result: BasicTokenResponse,
        previous_refresh: Option<String>,
    ) -> AccessToken {
        let now = Utc::now();
        let expires_in = token_result
            .expires_in()
            .map(|d| Duration::seconds(d.as_secs() as i64))
            .unwrap_or_else(|| Duration::seconds(DEFAULT_EXPIRES_IN_SECS));

        AccessToken {
            access_token: token_result.access_token().secret().to_string(),
            refresh_token: token_result
                .refresh_token()
                .map(|t| t.secret().to_string())
                .or(previous_refresh),
            obtained_at: now,
            expires_at: now + expires_in,
        }
    }
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// Stores the token record as a JSON file
///
/// One token per deployment, keyed by nothing. A missing file reads as
/// "no token"; everything else is an error for the caller to log.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ITokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AccessToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        let token: AccessToken =
            serde_json::from_str(&json).context("Failed to deserialize persisted token")?;
        debug!(path = %self.path.display(), "Loaded persisted token");
        Ok(Some(token))
    }

    fn save(&self, token: &AccessToken) -> Result<()> {
        let json = serde_json::to_string_pretty(token).context("Failed to serialize token")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Persisted token");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(anyhow::Error::new(err)
                    .context(format!("Failed to remove token file {}", self.path.display())))
            }
        }
    }
}

// ============================================================================
// TokenManager
// ============================================================================

/// Owns the process-wide access token and its lifecycle
///
/// State machine: `NoToken → Valid → NearExpiry → Expired → (Refreshing) →
/// Valid | NoToken`. The current token lives behind a mutex so the
/// check-expiry-then-use pattern and token replacement are atomic: no caller
/// can read a token that a concurrent renewal has just invalidated.
pub struct TokenManager {
    flow: ClientCredentialsFlow,
    store: Arc<dyn ITokenStore>,
    http_client: reqwest::Client,
    current: Mutex<Option<AccessToken>>,
}

impl TokenManager {
    /// Creates a token manager with the given grant configuration and store
    pub fn new(config: &OAuthConfig, store: Arc<dyn ITokenStore>) -> Result<Self> {
        Ok(Self {
            flow: ClientCredentialsFlow::new(config)?,
            store,
            http_client: reqwest::Client::new(),
            current: Mutex::new(None),
        })
    }

    /// Returns a bearer token for the next request.
    ///
    /// Fast path: when the cached token's remaining lifetime exceeds the
    /// safety margin, it is returned with no network call. This is the path
    /// nearly every remote request takes. Otherwise a full authentication
    /// runs (persisted token first, then the client-credentials grant).
    pub async fn bearer_token(&self) -> Result<String, RemoteError> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if !token.expires_within(Duration::minutes(EXPIRY_MARGIN_MINUTES)) {
                return Ok(token.access_token.clone());
            }
            debug!("Cached token inside expiry margin, re-authenticating");
        }

        let token = self.authenticate().await?;
        let bearer = token.access_token.clone();
        *current = Some(token);
        Ok(bearer)
    }

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Fails when no refresh token is on hand or the grant is rejected;
    /// callers are expected to fall back to [`bearer_token`] /
    /// [`force_reacquire`], which perform full re-authentication, rather
    /// than treating this as fatal.
    ///
    /// [`bearer_token`]: TokenManager::bearer_token
    /// [`force_reacquire`]: TokenManager::force_reacquire
    pub async fn refresh_access_token(&self) -> Result<String, RemoteError> {
        let mut current = self.current.lock().await;

        let refresh_token = current
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
            .ok_or_else(|| RemoteError::AuthFailed("no refresh token available".to_string()))?;

        info!("Refreshing access token");
        let token = self
            .flow
            .refresh_token(&refresh_token, &self.http_client)
            .await
            .map_err(|err| RemoteError::AuthFailed(format!("{err:#}")))?;

        self.persist(&token);
        let bearer = token.access_token.clone();
        *current = Some(token);
        Ok(bearer)
    }

    /// Discards the current token and acquires a fresh one.
    ///
    /// This is the reactive-renewal path used after a 401: the in-memory
    /// token is cleared, the persisted copy is dropped (it just failed), and
    /// a new token is obtained, via the refresh grant when a refresh token
    /// is on hand, falling back to the full client-credentials grant when
    /// the refresh grant is unavailable or rejected.
    pub async fn force_reacquire(&self) -> Result<String, RemoteError> {
        let mut current = self.current.lock().await;

        let refresh_token = current.as_ref().and_then(|t| t.refresh_token.clone());
        *current = None;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "Failed to clear persisted token");
        }

        if let Some(refresh) = refresh_token {
            match self.flow.refresh_token(&refresh, &self.http_client).await {
                Ok(token) => {
                    info!("Access token renewed via refresh grant");
                    self.persist(&token);
                    let bearer = token.access_token.clone();
                    *current = Some(token);
                    return Ok(bearer);
                }
                Err(err) => {
                    warn!(
                        error = %format!("{err:#}"),
                        "Refresh grant failed, falling back to full authentication"
                    );
                }
            }
        }

        let token = self.authenticate_fresh().await?;
        let bearer = token.access_token.clone();
        *current = Some(token);
        Ok(bearer)
    }

    /// Full authentication: adopt a usable persisted token, or run the grant.
    async fn authenticate(&self) -> Result<AccessToken, RemoteError> {
        match self.store.load() {
            Ok(Some(stored))
                if !stored.expires_within(Duration::minutes(EXPIRY_MARGIN_MINUTES)) =>
            {
                info!(
                    expires_at = %stored.expires_at,
                    "Adopted persisted token"
                );
                return Ok(stored);
            }
            Ok(Some(_)) => debug!("Persisted token expired or near expiry"),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Failed to load persisted token"),
        }

        self.authenticate_fresh().await
    }

    /// Runs the client-credentials grant and persists the result.
    async fn authenticate_fresh(&self) -> Result<AccessToken, RemoteError> {
        info!("Requesting access token (client-credentials grant)");
        let token = self
            .flow
            .request_token(&self.http_client)
            .await
            .map_err(|err| RemoteError::AuthFailed(format!("{err:#}")))?;

        info!(expires_at = %token.expires_at, "Authentication succeeded");
        self.persist(&token);
        Ok(token)
    }

    /// Best-effort persistence: a failed write must not fail the request
    /// that triggered the renewal.
    fn persist(&self, token: &AccessToken) {
        if let Err(err) = self.store.save(token) {
            warn!(error = %err, "Failed to persist token");
        }
    }
}
