//! Token store port
//!
//! Persistence for the OAuth2 access token, so a restarted process can adopt
//! a still-valid token instead of issuing a redundant token request. One
//! token per deployment; the store is keyed by nothing.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth2 access token with its lifecycle metadata
///
/// A single mutable instance of this lives in the token manager, superseded
/// whenever a grant succeeds; the full record is what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Token for the refresh grant, when the server issues one
    pub refresh_token: Option<String>,
    /// When the token was obtained
    pub obtained_at: DateTime<Utc>,
    /// Absolute expiry, computed from `expires_in` at acquisition time
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Returns true if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the token will expire within the given duration.
    ///
    /// This is the proactive safety-margin check: tokens inside the margin
    /// are renewed before use instead of risking a mid-request expiry.
    pub fn expires_within(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }
}

/// Port trait for access-token persistence
///
/// Implementations are humble adapters (a JSON file in the shipped build);
/// errors carry no domain classification.
pub trait ITokenStore: Send + Sync {
    /// Loads the persisted token, if one exists.
    fn load(&self) -> anyhow::Result<Option<AccessToken>>;

    /// Persists the full token record, replacing any previous one.
    fn save(&self, token: &AccessToken) -> anyhow::Result<()>;

    /// Removes the persisted token.
    fn clear(&self) -> anyhow::Result<()>;
}
