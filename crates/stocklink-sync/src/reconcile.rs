//! Item reconciliation
//!
//! For one source record and one target warehouse, decides what the remote
//! system needs: nothing exists → create; the item exists but is not
//! associated with the warehouse → associate (preserving the item's
//! identity); an association exists → update it with the source quantities.
//!
//! The existence status is computed fresh for every record and never cached
//! across records; the remote is the authority on what exists.

use std::sync::Arc;

use tracing::info;

use stocklink_core::config::StockLevelConfig;
use stocklink_core::domain::errors::RemoteError;
use stocklink_core::domain::record::SourceRecord;
use stocklink_core::ports::remote_inventory::{
    AssociationPayload, IRemoteInventory, RemoteItem, WarehouseAssociation,
};

/// The action a record requires against the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// The item does not exist remotely
    Create,
    /// The item exists but has no association with the target warehouse
    Associate,
    /// The item is already associated; adjust stock and cost
    Update,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncAction::Create => write!(f, "create"),
            SyncAction::Associate => write!(f, "associate"),
            SyncAction::Update => write!(f, "update"),
        }
    }
}

/// Transient existence snapshot for one (item, warehouse) pair
#[derive(Debug, Clone)]
pub struct ItemExistenceStatus {
    /// Whether the item exists remotely at all
    pub exists: bool,
    /// Whether it is associated with the target warehouse
    pub in_warehouse: bool,
    /// The remote item detail, when it exists
    pub item: Option<RemoteItem>,
    /// The matching association, when there is one
    pub association: Option<WarehouseAssociation>,
}

/// Classifies and applies per-record actions
pub struct ItemReconciler {
    remote: Arc<dyn IRemoteInventory>,
    stock_levels: StockLevelConfig,
}

impl ItemReconciler {
    /// Creates a reconciler over the given remote port.
    pub fn new(remote: Arc<dyn IRemoteInventory>, stock_levels: StockLevelConfig) -> Self {
        Self {
            remote,
            stock_levels,
        }
    }

    /// Fetches the remote existence state for one (item, warehouse) pair.
    ///
    /// A remote 404 (or an empty detail) reads as "does not exist" and will
    /// classify as [`SyncAction::Create`]; any other failure propagates and
    /// aborts this record only.
    pub async fn probe(
        &self,
        item_code: &str,
        warehouse_code: &str,
    ) -> Result<ItemExistenceStatus, RemoteError> {
        match self.remote.get_item(item_code).await? {
            None => Ok(ItemExistenceStatus {
                exists: false,
                in_warehouse: false,
                item: None,
                association: None,
            }),
            Some(item) => {
                let association = item.association_with(warehouse_code).cloned();
                Ok(ItemExistenceStatus {
                    exists: true,
                    in_warehouse: association.is_some(),
                    association,
                    item: Some(item),
                })
            }
        }
    }

    /// Derives the required action from an existence status.
    pub fn classify(status: &ItemExistenceStatus) -> SyncAction {
        match (status.exists, status.in_warehouse) {
            (false, _) => SyncAction::Create,
            (true, false) => SyncAction::Associate,
            (true, true) => SyncAction::Update,
        }
    }

    /// Derives the quantitative payload for a record.
    ///
    /// `location` carries the free-text source location label: a
    /// sublocation within the warehouse, distinct from the warehouse code.
    pub fn payload(&self, record: &SourceRecord, warehouse_code: &str) -> AssociationPayload {
        AssociationPayload {
            code: record.item_code.clone(),
            code_warehouse: warehouse_code.to_string(),
            stock: record.quantity_on_hand,
            unit_cost_stock: record.last_cost,
            min_stock_level: record.minimum_stock,
            max_stock_level: self.stock_levels.max_for(record.minimum_stock),
            location: record.location.clone(),
        }
    }

    /// Probes, classifies, and applies the action for one record.
    ///
    /// Returns the action that was applied so the orchestrator can count it.
    pub async fn reconcile(
        &self,
        record: &SourceRecord,
        warehouse_code: &str,
    ) -> Result<SyncAction, RemoteError> {
        let status = self.probe(&record.item_code, warehouse_code).await?;
        let action = Self::classify(&status);
        let payload = self.payload(record, warehouse_code);

        info!(
            item = %record.item_code,
            warehouse = %warehouse_code,
            action = %action,
            stock = payload.stock,
            "Applying reconciliation action"
        );

        match action {
            SyncAction::Update => self.remote.update_association(&payload).await?,
            // Create also goes through the association endpoint: the remote
            // materializes the item from the full payload (see DESIGN.md).
            SyncAction::Associate | SyncAction::Create => {
                self.remote.associate_warehouse(&payload).await?
            }
        }

        Ok(action)
    }
}
