//! CLI command implementations
//!
//! Each command loads the configuration, wires the adapters it needs, and
//! reports through the shared [`Reporter`](crate::output::Reporter).

pub mod check;
pub mod mappings;
pub mod sync;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use stocklink_cloud::auth::{FileTokenStore, OAuthConfig, TokenManager};
use stocklink_cloud::client::ApiClient;
use stocklink_cloud::provider::CloudInventoryProvider;
use stocklink_core::config::Config;
use stocklink_core::ports::inventory_source::IInventorySource;
use stocklink_core::ports::remote_inventory::IRemoteInventory;
use stocklink_source::SqlInventorySource;

/// Loads the configuration from the given path or the platform default.
pub(crate) fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    Config::load(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Connects the ERP source adapter.
pub(crate) async fn connect_source(config: &Config) -> Result<Arc<dyn IInventorySource>> {
    let source =
        SqlInventorySource::connect(&config.source.database_url, config.source.query.clone())
            .await?;
    Ok(Arc::new(source))
}

/// Wires the token manager and the remote API provider.
pub(crate) fn connect_remote(config: &Config) -> Result<Arc<dyn IRemoteInventory>> {
    let store = Arc::new(FileTokenStore::new(config.remote.token_cache_path.clone()));
    let oauth = OAuthConfig {
        token_url: config.remote.oauth_url.clone(),
        client_id: config.remote.client_id.clone(),
        client_secret: config.remote.client_secret.clone(),
    };
    let tokens = Arc::new(TokenManager::new(&oauth, store)?);
    let client = ApiClient::new(
        config.remote.base_url.clone(),
        Duration::from_secs(config.remote.timeout_secs),
        tokens.clone(),
    )?;
    Ok(Arc::new(CloudInventoryProvider::new(client, tokens)))
}
