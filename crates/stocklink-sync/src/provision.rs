//! Warehouse auto-provisioning
//!
//! Makes sure a target warehouse exists remotely before any record is
//! reconciled against it. Results are memoized for the lifetime of the
//! provisioner (the orchestrator creates one per pass), so each distinct
//! warehouse code costs at most one lookup and at most one creation call
//! per run.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use stocklink_core::config::WarehouseCreationConfig;
use stocklink_core::domain::errors::SyncError;
use stocklink_core::ports::remote_inventory::{IRemoteInventory, TargetWarehouse};

/// Ensures target warehouses exist, creating them on demand
pub struct WarehouseProvisioner {
    remote: Arc<dyn IRemoteInventory>,
    settings: WarehouseCreationConfig,
    /// Warehouses already verified or created during this run
    known: Mutex<HashMap<String, TargetWarehouse>>,
}

impl WarehouseProvisioner {
    /// Creates a provisioner for one sync pass.
    pub fn new(remote: Arc<dyn IRemoteInventory>, settings: WarehouseCreationConfig) -> Self {
        Self {
            remote,
            settings,
            known: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the warehouse with the given code, creating it if necessary.
    ///
    /// - Found remotely → returned as-is (idempotent, no mutation).
    /// - Reported 404 → created from the configured template, unless
    ///   auto-creation is disabled, which fails that record with
    ///   [`SyncError::WarehouseCreationDisabled`].
    /// - Any other lookup failure propagates unchanged; never create a
    ///   warehouse over an unknown failure.
    pub async fn ensure_exists(&self, code: &str) -> Result<TargetWarehouse, SyncError> {
        if let Some(known) = self.known.lock().await.get(code) {
            return Ok(known.clone());
        }

        match self.remote.get_warehouse(code).await? {
            Some(warehouse) => {
                debug!(code, "Warehouse already exists");
                self.known
                    .lock()
                    .await
                    .insert(code.to_string(), warehouse.clone());
                Ok(warehouse)
            }
            None => {
                if !self.settings.enabled {
                    error!(code, "Warehouse missing and auto-creation is disabled");
                    return Err(SyncError::WarehouseCreationDisabled {
                        code: code.to_string(),
                    });
                }

                info!(code, "Warehouse missing, creating it");
                let spec = self.settings.build_warehouse(code);
                let created = self.remote.create_warehouse(&spec).await?;
                self.known
                    .lock()
                    .await
                    .insert(code.to_string(), created.clone());
                Ok(created)
            }
        }
    }
}
