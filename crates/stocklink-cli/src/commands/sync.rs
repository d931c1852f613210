//! Sync command - run one inventory sync pass
//!
//! Wires the source and remote adapters, runs the engine, and prints the
//! run record. The process exit code reflects the run outcome so cron-style
//! wrappers can alert on failures.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use stocklink_sync::engine::SyncEngine;
use stocklink_sync::state::SyncStateTracker;

use crate::output::{OutputFormat, Reporter};

#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn execute(&self, config_path: Option<&str>, format: OutputFormat) -> Result<()> {
        let reporter = Reporter::new(format);

        let config = super::load_config(config_path)?;
        config.validate()?;

        let source = super::connect_source(&config).await?;
        let remote = super::connect_remote(&config)?;
        let tracker = Arc::new(SyncStateTracker::new());

        info!("Starting synchronization");
        let engine = SyncEngine::new(source, remote, config, tracker);
        let record = engine.run_pass().await?;

        reporter.json(&serde_json::to_value(&record)?);

        if record.success {
            let duration = if record.duration_ms >= 1000 {
                format!("{:.1}s", record.duration_ms as f64 / 1000.0)
            } else {
                format!("{}ms", record.duration_ms)
            };
            reporter.success(&format!("Sync completed in {duration}"));
            reporter.detail(&format!("Source records: {}", record.totals.total));
            reporter.detail(&format!("Processed:      {}", record.totals.processed));
            reporter.detail(&format!("Skipped:        {}", record.totals.skipped));
            reporter.detail(&format!("Updated:        {}", record.totals.updated));
            reporter.detail(&format!(
                "Created/assoc.: {}",
                record.totals.created_or_associated
            ));
            reporter.detail(&format!("Errors:         {}", record.totals.errors));
            if !record.warehouses_touched.is_empty() {
                reporter.detail(&format!(
                    "Warehouses:     {}",
                    record.warehouses_touched.join(", ")
                ));
            }
            Ok(())
        } else {
            let cause = record.error.unwrap_or_else(|| "unknown error".to_string());
            reporter.error(&format!("Sync failed: {cause}"));
            Err(anyhow::anyhow!("sync pass failed: {cause}"))
        }
    }
}
