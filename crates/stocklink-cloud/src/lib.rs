//! Stocklink Cloud - Remote inventory API client
//!
//! Provides the async adapter for the cloud inventory-management API:
//! - OAuth2 client-credentials token lifecycle (acquire, cache, refresh,
//!   single bounded retry on 401)
//! - Authenticated HTTP client with explicit error classification
//! - Typed warehouse and inventory endpoints
//!
//! ## Modules
//!
//! - [`auth`] - Token manager, client-credentials flow, file token store
//! - [`client`] - Authenticated HTTP client with the 401 retry decorator
//! - [`inventory`] - Warehouse and inventory endpoint operations
//! - [`provider`] - `IRemoteInventory` port implementation

pub mod auth;
pub mod client;
pub mod inventory;
pub mod provider;
