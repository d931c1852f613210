//! Check command - pre-flight validation without touching any record
//!
//! Runs the same checks a sync pass runs before its main loop: static
//! configuration, the source database probe, and a remote token
//! acquisition. Exits non-zero when any of them fails.

use anyhow::Result;
use clap::Args;

use stocklink_core::ports::inventory_source::IInventorySource;
use stocklink_core::ports::remote_inventory::IRemoteInventory;

use crate::output::{OutputFormat, Reporter};

#[derive(Debug, Args)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(&self, config_path: Option<&str>, format: OutputFormat) -> Result<()> {
        let reporter = Reporter::new(format);
        let mut failures = Vec::new();

        let config = super::load_config(config_path)?;

        match config.validate() {
            Ok(()) => reporter.detail("Configuration: ok"),
            Err(err) => {
                reporter.error(&format!("Configuration: {err}"));
                failures.push(format!("configuration: {err}"));
            }
        }

        match super::connect_source(&config).await {
            Ok(source) => {
                if source.probe().await {
                    reporter.detail("Source database: ok");
                } else {
                    reporter.error("Source database: probe failed");
                    failures.push("source probe failed".to_string());
                }
            }
            Err(err) => {
                reporter.error(&format!("Source database: {err:#}"));
                failures.push(format!("source connection: {err:#}"));
            }
        }

        match super::connect_remote(&config) {
            Ok(remote) => match remote.verify_credentials().await {
                Ok(()) => reporter.detail("Remote API authentication: ok"),
                Err(err) => {
                    reporter.error(&format!("Remote API authentication: {err}"));
                    failures.push(format!("remote authentication: {err}"));
                }
            },
            Err(err) => {
                reporter.error(&format!("Remote API: {err:#}"));
                failures.push(format!("remote setup: {err:#}"));
            }
        }

        reporter.json(&serde_json::json!({
            "success": failures.is_empty(),
            "failures": failures,
        }));

        if failures.is_empty() {
            reporter.success("All pre-flight checks passed");
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "pre-flight checks failed: {}",
                failures.join("; ")
            ))
        }
    }
}
