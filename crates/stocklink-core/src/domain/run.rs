//! Sync run records
//!
//! This module defines the immutable record produced by every sync pass,
//! the counter block accumulated during the pass, and the lifetime
//! statistics kept by the state tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Counters accumulated over one sync pass
///
/// `processed` counts every record that was not skipped, including records
/// whose remote action later failed; failed records additionally increment
/// `errors`. So `processed = total - skipped` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Records returned by the source read
    pub total: u64,
    /// Records attempted (total minus skipped)
    pub processed: u64,
    /// Records skipped for blank fields or an unmapped location
    pub skipped: u64,
    /// Existing associations that received a stock/cost adjustment
    pub updated: u64,
    /// Items newly created remotely or newly associated with a warehouse
    pub created_or_associated: u64,
    /// Records whose remote action failed
    pub errors: u64,
}

/// The outcome of one completed sync pass
///
/// Immutable once finalized by the state tracker; appended to the bounded
/// in-memory run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRunRecord {
    /// Unique identifier for this run
    pub id: Uuid,
    /// When the pass started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
    /// Whether the pass fell through without a top-level failure
    pub success: bool,
    /// The causing error's message when `success` is false
    pub error: Option<String>,
    /// Per-record counters
    pub totals: RunTotals,
    /// Warehouse codes verified or created during the pass, sorted
    pub warehouses_touched: Vec<String>,
}

/// Lifetime counters across all runs of this process
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeStats {
    /// Total passes attempted
    pub total_runs: u64,
    /// Passes that completed without a top-level failure
    pub successful_runs: u64,
    /// Passes that failed at the top level
    pub failed_runs: u64,
    /// Start time of the most recent pass
    pub last_run_at: Option<DateTime<Utc>>,
}
