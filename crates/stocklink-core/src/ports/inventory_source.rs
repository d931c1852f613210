//! Inventory source port (driven/secondary port)
//!
//! This module defines the interface for reading inventory records from the
//! source-of-truth ERP system. The shipped implementation runs a fixed SQL
//! read (`stocklink-source`), but the trait is deliberately narrow: one
//! tabular fetch and a connectivity probe, nothing else.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at this boundary are
//!   adapter-specific and don't need domain-level classification; the
//!   orchestrator treats any fetch failure as `ConnectionUnavailable`.
//! - The probe returns a plain `bool` so the pre-flight check cannot be
//!   confused with a fetch failure.

use crate::domain::record::SourceRecord;

/// Port trait for the ERP inventory source
#[async_trait::async_trait]
pub trait IInventorySource: Send + Sync {
    /// Reads the full inventory record set in one pass.
    ///
    /// The sync engine pulls all rows once per pass; there is no
    /// incremental or streaming variant.
    async fn fetch_records(&self) -> anyhow::Result<Vec<SourceRecord>>;

    /// Cheap connectivity probe used during pre-flight validation.
    async fn probe(&self) -> bool;
}
