//! Configuration module for Stocklink.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, and defaults. The mapping table is part
//! of the configuration and is validated before any run touches I/O.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncError;
use crate::domain::mapping::LocationMap;
use crate::ports::remote_inventory::TargetWarehouse;

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Stocklink.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub remote: RemoteConfig,
    pub mapping: LocationMap,
    /// Optional section; auto-creation is off when omitted.
    #[serde(default)]
    pub warehouse_creation: WarehouseCreationConfig,
    /// Optional section; the stock-level knobs have built-in defaults.
    #[serde(default)]
    pub stock_levels: StockLevelConfig,
}

/// ERP source database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database URL for the ERP read (any sqlx-supported scheme).
    pub database_url: String,
    /// Optional override of the fixed inventory query.
    #[serde(default)]
    pub query: Option<String>,
}

/// Remote API and OAuth2 settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote inventory API.
    pub base_url: String,
    /// OAuth2 token endpoint.
    pub oauth_url: String,
    /// Client id for the client-credentials grant.
    pub client_id: String,
    /// Client secret for the client-credentials grant.
    pub client_secret: String,
    /// Bounded timeout applied to every remote HTTP call.
    pub timeout_secs: u64,
    /// Where the acquired token is cached between runs.
    pub token_cache_path: PathBuf,
}

/// Warehouse auto-provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseCreationConfig {
    /// Whether missing warehouses may be created automatically.
    pub enabled: bool,
    /// Description template; `{code}` is replaced with the warehouse code.
    pub description_template: String,
    /// Static attributes applied to every auto-created warehouse.
    #[serde(default)]
    pub defaults: WarehouseDefaults,
}

/// Default attribute block for auto-created warehouses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseDefaults {
    pub active: bool,
    pub external_integration: bool,
    pub transfer_approval: bool,
    pub visible_to_all: bool,
}

/// Stock-level derivation knobs.
///
/// `max_stock_level` is `minimum_stock * max_multiplier` when the minimum is
/// positive, and `max_fallback` when it is zero or absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevelConfig {
    pub max_multiplier: f64,
    pub max_fallback: f64,
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/stocklink/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("stocklink")
            .join("config.yaml")
    }

    /// Validates the static configuration before any I/O happens.
    ///
    /// Every problem is collected so the operator sees the full list in one
    /// `ConfigInvalid` error rather than fixing them one at a time.
    pub fn validate(&self) -> Result<(), SyncError> {
        let mut problems = Vec::new();

        if let Err(err) = self.mapping.validate() {
            problems.push(err.to_string());
        }
        if self.remote.base_url.trim().is_empty() {
            problems.push("remote.base_url is not set".to_string());
        }
        if self.remote.oauth_url.trim().is_empty() {
            problems.push("remote.oauth_url is not set".to_string());
        }
        if self.remote.client_id.trim().is_empty() {
            problems.push("remote.client_id is not set".to_string());
        }
        if self.remote.client_secret.trim().is_empty() {
            problems.push("remote.client_secret is not set".to_string());
        }
        if self.source.database_url.trim().is_empty() {
            problems.push("source.database_url is not set".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SyncError::ConfigInvalid(problems.join(", ")))
        }
    }
}

impl WarehouseCreationConfig {
    /// Builds the creation payload for a missing warehouse.
    pub fn build_warehouse(&self, code: &str) -> TargetWarehouse {
        TargetWarehouse {
            code: code.to_string(),
            description: self.description_template.replace("{code}", code),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
            zip_code: String::new(),
            active: self.defaults.active,
            external_integration: self.defaults.external_integration,
            transfer_approval: self.defaults.transfer_approval,
            visible_to_all: self.defaults.visible_to_all,
        }
    }
}

impl StockLevelConfig {
    /// Derives the maximum stock level from a minimum stock level.
    pub fn max_for(&self, minimum_stock: f64) -> f64 {
        if minimum_stock > 0.0 {
            minimum_stock * self.max_multiplier
        } else {
            self.max_fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            oauth_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: 30,
            token_cache_path: PathBuf::from(".stocklink-token.json"),
        }
    }
}

impl Default for WarehouseCreationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            description_template: "Warehouse {code} (ERP sync)".to_string(),
            defaults: WarehouseDefaults::default(),
        }
    }
}

impl Default for WarehouseDefaults {
    fn default() -> Self {
        Self {
            active: true,
            external_integration: true,
            transfer_approval: false,
            visible_to_all: false,
        }
    }
}

impl Default for StockLevelConfig {
    fn default() -> Self {
        Self {
            max_multiplier: 3.0,
            max_fallback: 100.0,
        }
    }
}
