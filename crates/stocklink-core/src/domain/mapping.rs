//! Location-to-warehouse mapping
//!
//! Maps ERP location codes to remote warehouse codes. Each location carries a
//! default warehouse plus an ordered list of keyword override rules; the
//! first matching rule wins and short-circuits the rest. Rule order is a
//! correctness contract (hazardous-material rules are expected to pre-empt
//! generic defaults), so rules are held in a `Vec` and scanned in declaration
//! order, never re-sorted.
//!
//! The whole table is static configuration: loaded once at startup and
//! read-only during a run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::errors::SyncError;

/// A single keyword override rule
///
/// Matches case-insensitively as a substring against either the item code or
/// the item description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Human-readable rule name, used in logs
    pub name: String,
    /// Keywords; any one matching triggers the rule
    pub keywords: Vec<String>,
    /// Warehouse code assigned when the rule matches
    pub warehouse: String,
}

impl MappingRule {
    /// Returns true when any keyword occurs in the item code or description.
    fn matches(&self, item_code: &str, description: &str) -> bool {
        let code = item_code.to_uppercase();
        let desc = description.to_uppercase();
        self.keywords.iter().any(|keyword| {
            let keyword = keyword.to_uppercase();
            code.contains(&keyword) || desc.contains(&keyword)
        })
    }
}

/// Mapping entry for one ERP location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMapping {
    /// Default warehouse for this location
    pub warehouse: String,
    /// Override rules, evaluated in declaration order
    #[serde(default)]
    pub rules: Vec<MappingRule>,
}

/// The full location mapping table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationMap {
    /// Global default warehouse; must exist for the configuration to be valid
    pub default_warehouse: String,
    /// Per-location mappings, keyed by ERP location code
    #[serde(default)]
    pub locations: HashMap<String, LocationMapping>,
}

impl LocationMap {
    /// Resolves an ERP location to a remote warehouse code.
    ///
    /// Returns `None` when the location is not in the table; the caller
    /// must skip the record rather than fall back silently. When the
    /// location carries override rules, the first rule (in declaration
    /// order) whose keywords match the item code or description wins; if
    /// none match, the location's default warehouse is used.
    pub fn resolve(&self, location: &str, item_code: &str, description: &str) -> Option<&str> {
        let mapping = self.locations.get(location)?;

        for rule in &mapping.rules {
            if rule.matches(item_code, description) {
                return Some(&rule.warehouse);
            }
        }

        Some(&mapping.warehouse)
    }

    /// Validates the table before a run touches any I/O.
    ///
    /// Collects every problem into a single `ConfigInvalid` message so the
    /// operator sees the full list at once.
    pub fn validate(&self) -> Result<(), SyncError> {
        let mut problems = Vec::new();

        if self.locations.is_empty() {
            problems.push("no location mappings configured".to_string());
        }
        if self.default_warehouse.trim().is_empty() {
            problems.push("no default warehouse configured".to_string());
        }
        for (location, mapping) in &self.locations {
            if mapping.warehouse.trim().is_empty() {
                problems.push(format!("location {location} has an empty warehouse code"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SyncError::ConfigInvalid(problems.join(", ")))
        }
    }

    /// Returns the configured location codes, sorted for stable output.
    pub fn supported_locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self.locations.keys().map(String::as_str).collect();
        locations.sort_unstable();
        locations
    }
}
