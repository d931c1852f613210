//! Remote inventory port (driven/secondary port)
//!
//! This module defines the interface for the cloud inventory-management API.
//! The primary implementation lives in `stocklink-cloud` and speaks the
//! remote REST dialect; the trait is shaped so the engine never sees HTTP.
//!
//! ## Design Notes
//!
//! - Methods return `Result<_, RemoteError>` rather than `anyhow::Result`:
//!   the error classification is part of the contract (the reconciler and
//!   provisioner branch on it).
//! - Lookups return `Ok(None)` for a remote 404. "Not found" drives the
//!   Create/provisioning paths and must stay distinguishable from real
//!   failures by construction.
//! - The DTOs here are port-level wire shapes, not domain entities.

use serde::{Deserialize, Serialize};

use crate::domain::errors::RemoteError;

/// A warehouse as the remote system describes it
///
/// Doubles as the creation payload: the provisioner fills the same shape
/// from the configured template and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetWarehouse {
    /// Unique warehouse code
    pub code: String,
    /// Display description
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
    /// Whether the warehouse is active
    #[serde(default)]
    pub active: bool,
    /// Marks the warehouse as fed by an external integration
    #[serde(default)]
    pub external_integration: bool,
    /// Whether stock transfers require approval
    #[serde(default)]
    pub transfer_approval: bool,
    /// Whether the warehouse is visible to all remote users
    #[serde(default)]
    pub visible_to_all: bool,
}

/// One item-to-warehouse association from the remote item detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseAssociation {
    /// Code of the associated warehouse
    pub code_warehouse: String,
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub min_stock_level: f64,
    #[serde(default)]
    pub max_stock_level: f64,
    #[serde(default)]
    pub unit_cost_stock: f64,
    /// Free-text sublocation label within the warehouse
    #[serde(default)]
    pub location: String,
}

/// Remote item detail, including its warehouse associations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    /// Item code, shared with the source system
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Associations; empty when the item is not stocked anywhere
    #[serde(default)]
    pub warehouses: Vec<WarehouseAssociation>,
}

impl RemoteItem {
    /// Finds this item's association with the given warehouse, if any.
    pub fn association_with(&self, warehouse_code: &str) -> Option<&WarehouseAssociation> {
        self.warehouses
            .iter()
            .find(|assoc| assoc.code_warehouse == warehouse_code)
    }
}

/// Quantitative payload sent on every update/associate/create action
///
/// Derived deterministically from a source record; see the reconciler for
/// the derivation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationPayload {
    /// Item code
    pub code: String,
    /// Target warehouse code
    pub code_warehouse: String,
    pub stock: f64,
    pub unit_cost_stock: f64,
    pub min_stock_level: f64,
    pub max_stock_level: f64,
    /// Free-text sublocation label (the source location, not the warehouse)
    pub location: String,
}

/// Port trait for the remote inventory API
///
/// All methods authenticate transparently: implementations own the token
/// lifecycle, including the single bounded retry after an expired-token 401.
#[async_trait::async_trait]
pub trait IRemoteInventory: Send + Sync {
    /// Acquires (or validates) an access token without touching any record.
    ///
    /// Used by the orchestrator's pre-flight check.
    async fn verify_credentials(&self) -> Result<(), RemoteError>;

    /// Looks up a warehouse by code. `Ok(None)` when the remote reports 404.
    async fn get_warehouse(&self, code: &str) -> Result<Option<TargetWarehouse>, RemoteError>;

    /// Creates a warehouse from the given attributes.
    async fn create_warehouse(
        &self,
        warehouse: &TargetWarehouse,
    ) -> Result<TargetWarehouse, RemoteError>;

    /// Fetches the remote item detail by code. `Ok(None)` when the item
    /// does not exist remotely.
    async fn get_item(&self, item_code: &str) -> Result<Option<RemoteItem>, RemoteError>;

    /// Applies a stock/cost adjustment to an existing association.
    async fn update_association(&self, payload: &AssociationPayload) -> Result<(), RemoteError>;

    /// Creates a new warehouse association for an item (also used for the
    /// Create path; see DESIGN.md).
    async fn associate_warehouse(&self, payload: &AssociationPayload) -> Result<(), RemoteError>;
}
