//! Source inventory records
//!
//! A [`SourceRecord`] is one row of the ERP inventory read: one item at one
//! physical location. Records are read-only to the core; the source adapter
//! trims the text fields on the way in.

use serde::{Deserialize, Serialize};

/// One inventory row from the ERP system
///
/// Identity is the `(item_code, location)` pair: the same item can appear
/// once per physical location with independent quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Item number, unique per location
    pub item_code: String,
    /// Physical location code in the ERP (e.g. "GRAL")
    pub location: String,
    /// Item description
    pub description: String,
    /// Current stock quantity at this location
    pub quantity_on_hand: f64,
    /// Configured minimum stock level
    pub minimum_stock: f64,
    /// Most recent unit cost
    pub last_cost: f64,
}

impl SourceRecord {
    /// Returns true when the record carries the fields a sync pass needs.
    ///
    /// A record without an item code or a location cannot be reconciled;
    /// the orchestrator skips such records with a warning instead of
    /// counting them as errors.
    pub fn is_valid(&self) -> bool {
        !self.item_code.trim().is_empty() && !self.location.trim().is_empty()
    }
}
