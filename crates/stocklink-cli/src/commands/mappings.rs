//! Mappings command - show the location-to-warehouse mapping table
//!
//! Prints the supported ERP locations, their target warehouses, and any
//! keyword override rules in evaluation order, so operators can see where
//! a record will land without running a pass.

use anyhow::Result;
use clap::Args;

use crate::output::{OutputFormat, Reporter};

#[derive(Debug, Args)]
pub struct MappingsCommand {}

impl MappingsCommand {
    pub async fn execute(&self, config_path: Option<&str>, format: OutputFormat) -> Result<()> {
        let reporter = Reporter::new(format);
        let config = super::load_config(config_path)?;
        let mapping = &config.mapping;

        reporter.json(&serde_json::json!({
            "default_warehouse": mapping.default_warehouse,
            "supported_locations": mapping.supported_locations(),
            "locations": mapping.locations,
        }));

        reporter.success(&format!(
            "Default warehouse: {}",
            mapping.default_warehouse
        ));
        for location in mapping.supported_locations() {
            // supported_locations only lists keys present in the table
            let entry = &mapping.locations[location];
            reporter.detail(&format!("{location} -> {}", entry.warehouse));
            for rule in &entry.rules {
                reporter.detail(&format!(
                    "    [{}] {} -> {}",
                    rule.name,
                    rule.keywords.join(", "),
                    rule.warehouse
                ));
            }
        }

        Ok(())
    }
}
