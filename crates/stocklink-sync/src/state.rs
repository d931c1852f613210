//! Process-wide sync run state
//!
//! The tracker is the single point of mutual exclusion for sync passes:
//! `begin` fails fast when a pass is already in progress, whatever triggered
//! it. It also keeps lifetime counters, the last result, and a bounded
//! rolling history. All read accessors return owned copies, so callers can
//! never mutate internal state through them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use stocklink_core::domain::errors::SyncError;
use stocklink_core::domain::run::{LifetimeStats, RunTotals, SyncRunRecord};

use crate::engine::PassOutcome;

/// Only the 10 most recent runs are kept in memory
const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct TrackerState {
    in_progress: bool,
    stats: LifetimeStats,
    last_result: Option<SyncRunRecord>,
    history: VecDeque<SyncRunRecord>,
}

/// Read-only view of the tracker, with owned copies of everything
#[derive(Debug, Clone, Serialize)]
pub struct TrackerSnapshot {
    pub in_progress: bool,
    pub stats: LifetimeStats,
    pub last_result: Option<SyncRunRecord>,
    pub history: Vec<SyncRunRecord>,
}

/// Guards the single-concurrent-run invariant and records run outcomes
#[derive(Debug, Default)]
pub struct SyncStateTracker {
    state: Mutex<TrackerState>,
}

impl SyncStateTracker {
    /// Creates a tracker with empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a pass as started and returns its start timestamp.
    ///
    /// Fails immediately with [`SyncError::AlreadyRunning`] when a pass is
    /// in progress; the running pass is unaffected.
    pub async fn begin(&self) -> Result<DateTime<Utc>, SyncError> {
        let mut state = self.state.lock().await;
        if state.in_progress {
            warn!("Sync pass rejected: another pass is in progress");
            return Err(SyncError::AlreadyRunning);
        }
        state.in_progress = true;
        info!("Sync state: started");
        Ok(Utc::now())
    }

    /// Finalizes a pass: clears the in-progress flag, computes the duration,
    /// bumps lifetime counters, and records the run in the history.
    pub async fn finish(
        &self,
        started_at: DateTime<Utc>,
        outcome: Result<PassOutcome, SyncError>,
    ) -> SyncRunRecord {
        let mut state = self.state.lock().await;
        state.in_progress = false;

        let duration_ms = (Utc::now() - started_at).num_milliseconds().max(0) as u64;
        let record = match outcome {
            Ok(outcome) => {
                state.stats.successful_runs += 1;
                info!(duration_ms, "Sync state: completed");
                SyncRunRecord {
                    id: Uuid::new_v4(),
                    started_at,
                    duration_ms,
                    success: true,
                    error: None,
                    totals: outcome.totals,
                    warehouses_touched: outcome.warehouses_touched.into_iter().collect(),
                }
            }
            Err(err) => {
                state.stats.failed_runs += 1;
                error!(duration_ms, error = %err, "Sync state: failed");
                SyncRunRecord {
                    id: Uuid::new_v4(),
                    started_at,
                    duration_ms,
                    success: false,
                    error: Some(err.to_string()),
                    totals: RunTotals::default(),
                    warehouses_touched: Vec::new(),
                }
            }
        };

        state.stats.total_runs += 1;
        state.stats.last_run_at = Some(started_at);
        state.last_result = Some(record.clone());
        state.history.push_front(record.clone());
        state.history.truncate(HISTORY_LIMIT);

        record
    }

    /// Whether a pass is currently running.
    pub async fn is_in_progress(&self) -> bool {
        self.state.lock().await.in_progress
    }

    /// Owned copy of the full tracker state.
    pub async fn snapshot(&self) -> TrackerSnapshot {
        let state = self.state.lock().await;
        TrackerSnapshot {
            in_progress: state.in_progress,
            stats: state.stats.clone(),
            last_result: state.last_result.clone(),
            history: state.history.iter().cloned().collect(),
        }
    }

    /// Owned copy of the most recent run record.
    pub async fn last_result(&self) -> Option<SyncRunRecord> {
        self.state.lock().await.last_result.clone()
    }

    /// Owned copies of up to `limit` most recent runs, newest first.
    pub async fn history(&self, limit: usize) -> Vec<SyncRunRecord> {
        self.state
            .lock()
            .await
            .history
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }
}
