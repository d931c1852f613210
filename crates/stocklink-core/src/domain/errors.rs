//! Domain error types
//!
//! This module defines the two error enums the whole system is built around:
//!
//! - [`RemoteError`] classifies failures of calls against the remote
//!   inventory API. The classification is load-bearing: the reconciler and
//!   the provisioner branch on it (an unauthorized endpoint must never
//!   trigger a token renewal, a transient failure is scoped to one record).
//! - [`SyncError`] covers the orchestration layer: configuration and
//!   connectivity failures that abort a whole run, the mutual-exclusion
//!   conflict, and per-record provisioning failures.

use thiserror::Error;

/// Errors raised by the remote inventory API adapter
///
/// Lookup 404s are not represented here: the port normalizes them to
/// `Ok(None)` so that "not found" stays control flow rather than an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The endpoint itself is not available to these credentials
    /// (missing permission or module). Renewing the token cannot fix
    /// this, so it is never retried.
    #[error("endpoint not authorized: {endpoint}")]
    UnauthorizedEndpoint {
        /// The request path that was rejected
        endpoint: String,
    },

    /// Authentication failed even after a single renew-and-retry cycle
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The resource addressed by a mutation does not exist
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status other than 401/404
    #[error("remote API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body, if any
        message: String,
    },

    /// A transport-level failure (connection, timeout, DNS)
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be parsed into the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by the sync orchestration layer
#[derive(Debug, Error)]
pub enum SyncError {
    /// Static configuration is unusable; raised before any I/O
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A pre-flight connectivity check failed; the run never starts
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// Another sync pass is already in progress
    #[error("a sync pass is already in progress")]
    AlreadyRunning,

    /// A target warehouse is missing and auto-creation is disabled
    #[error("warehouse {code} not found and auto-creation is disabled")]
    WarehouseCreationDisabled {
        /// The warehouse code that could not be resolved
        code: String,
    },

    /// A remote API call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
