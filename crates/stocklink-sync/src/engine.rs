//! The sync orchestrator
//!
//! Drives one full pass: validate configuration, probe both upstream
//! connections, pull the complete source record set once, then reconcile
//! records strictly sequentially; the remote documents no concurrency
//! contract, and sequential writes rule out races on the same
//! item/warehouse pair by construction.
//!
//! A single bad record never aborts the pass: skips are warned and counted,
//! per-record failures increment the error counter and the loop continues.
//! Only pre-flight failures fail the run as a whole.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use stocklink_core::config::Config;
use stocklink_core::domain::errors::SyncError;
use stocklink_core::domain::run::{RunTotals, SyncRunRecord};
use stocklink_core::ports::inventory_source::IInventorySource;
use stocklink_core::ports::remote_inventory::IRemoteInventory;

use crate::provision::WarehouseProvisioner;
use crate::reconcile::{ItemReconciler, SyncAction};
use crate::state::SyncStateTracker;

/// Progress is logged every this many processed records
const PROGRESS_LOG_INTERVAL: u64 = 100;

/// What a completed pass hands to the state tracker
#[derive(Debug)]
pub struct PassOutcome {
    /// Per-record counters
    pub totals: RunTotals,
    /// Warehouse codes verified or created during the pass
    pub warehouses_touched: BTreeSet<String>,
}

/// One-pass reconciliation engine
///
/// ## Dependencies
///
/// - `source`: the ERP inventory read (IInventorySource)
/// - `remote`: the cloud inventory API (IRemoteInventory)
/// - `tracker`: process-wide run state and mutual exclusion
pub struct SyncEngine {
    source: Arc<dyn IInventorySource>,
    remote: Arc<dyn IRemoteInventory>,
    config: Config,
    tracker: Arc<SyncStateTracker>,
}

impl SyncEngine {
    /// Creates an engine with the given adapters and configuration.
    pub fn new(
        source: Arc<dyn IInventorySource>,
        remote: Arc<dyn IRemoteInventory>,
        config: Config,
        tracker: Arc<SyncStateTracker>,
    ) -> Self {
        Self {
            source,
            remote,
            config,
            tracker,
        }
    }

    /// Returns the shared run-state tracker.
    pub fn tracker(&self) -> &Arc<SyncStateTracker> {
        &self.tracker
    }

    /// Runs one sync pass to completion and returns its run record.
    ///
    /// Refuses to start while another pass is in progress
    /// ([`SyncError::AlreadyRunning`]); the caller gets the conflict
    /// immediately rather than being queued. Every started pass produces a
    /// run record; pre-flight failures end as a failed record, not a
    /// panic or a half-tracked state.
    pub async fn run_pass(&self) -> Result<SyncRunRecord, SyncError> {
        let started_at = self.tracker.begin().await?;
        info!("Starting inventory sync pass");

        let outcome = self.execute().await;
        let record = self.tracker.finish(started_at, outcome).await;
        Ok(record)
    }

    /// The pass body: pre-flight, main loop, summary.
    async fn execute(&self) -> Result<PassOutcome, SyncError> {
        // Pre-flight: static configuration, before any I/O.
        self.config.validate()?;
        debug!("Configuration validated");

        // Pre-flight: both upstream connections. A failure here aborts the
        // whole run without touching a single record.
        if !self.source.probe().await {
            return Err(SyncError::ConnectionUnavailable(
                "source database probe failed".to_string(),
            ));
        }
        self.remote.verify_credentials().await.map_err(|err| {
            SyncError::ConnectionUnavailable(format!("remote authentication failed: {err}"))
        })?;
        debug!("Upstream connections validated");

        // One full fetch; no incremental or streaming read.
        let records = self.source.fetch_records().await.map_err(|err| {
            SyncError::ConnectionUnavailable(format!("source read failed: {err:#}"))
        })?;
        info!(records = records.len(), "Fetched source records");

        // Fresh provisioner per pass; its memo deduplicates warehouse
        // lookups and creation attempts within this run only.
        let provisioner = WarehouseProvisioner::new(
            self.remote.clone(),
            self.config.warehouse_creation.clone(),
        );
        let reconciler =
            ItemReconciler::new(self.remote.clone(), self.config.stock_levels.clone());

        let mut totals = RunTotals {
            total: records.len() as u64,
            ..RunTotals::default()
        };
        let mut warehouses_touched = BTreeSet::new();

        for record in &records {
            if !record.is_valid() {
                warn!(
                    item = %record.item_code,
                    location = %record.location,
                    "Record missing item code or location, skipping"
                );
                totals.skipped += 1;
                continue;
            }

            let Some(warehouse_code) = self.config.mapping.resolve(
                &record.location,
                &record.item_code,
                &record.description,
            ) else {
                warn!(
                    item = %record.item_code,
                    location = %record.location,
                    "No warehouse mapping for location, skipping record"
                );
                totals.skipped += 1;
                continue;
            };
            let warehouse_code = warehouse_code.to_string();

            totals.processed += 1;

            match provisioner.ensure_exists(&warehouse_code).await {
                Ok(_) => {
                    warehouses_touched.insert(warehouse_code.clone());
                }
                Err(err) => {
                    totals.errors += 1;
                    warn!(
                        item = %record.item_code,
                        warehouse = %warehouse_code,
                        error = %err,
                        "Could not provision warehouse for record"
                    );
                    continue;
                }
            }

            match reconciler.reconcile(record, &warehouse_code).await {
                Ok(SyncAction::Update) => totals.updated += 1,
                Ok(SyncAction::Associate) | Ok(SyncAction::Create) => {
                    totals.created_or_associated += 1
                }
                Err(err) => {
                    totals.errors += 1;
                    warn!(
                        item = %record.item_code,
                        warehouse = %warehouse_code,
                        error = %err,
                        "Failed to reconcile record"
                    );
                }
            }

            if totals.processed % PROGRESS_LOG_INTERVAL == 0 {
                info!(
                    processed = totals.processed,
                    total = totals.total,
                    "Sync progress"
                );
            }
        }

        info!(
            total = totals.total,
            processed = totals.processed,
            skipped = totals.skipped,
            updated = totals.updated,
            created_or_associated = totals.created_or_associated,
            errors = totals.errors,
            warehouses = warehouses_touched.len(),
            "Sync pass finished"
        );

        Ok(PassOutcome {
            totals,
            warehouses_touched,
        })
    }
}
