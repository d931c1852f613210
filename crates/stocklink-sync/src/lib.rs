//! Stocklink Sync - The reconciliation engine
//!
//! Drives one full pass over the ERP inventory: for each source record,
//! map its location to a target warehouse, make sure that warehouse exists
//! remotely, classify the required action (update / associate / create),
//! and apply it, accumulating run statistics as it goes.
//!
//! ## Modules
//!
//! - [`engine`] - The sync orchestrator (pre-flight, main loop, summary)
//! - [`reconcile`] - Per-item existence probe, classification, payloads
//! - [`provision`] - Warehouse auto-provisioning, memoized per run
//! - [`state`] - Process-wide run state: mutual exclusion, stats, history

pub mod engine;
pub mod provision;
pub mod reconcile;
pub mod state;

pub use engine::{PassOutcome, SyncEngine};
pub use provision::WarehouseProvisioner;
pub use reconcile::{ItemExistenceStatus, ItemReconciler, SyncAction};
pub use state::{SyncStateTracker, TrackerSnapshot};
