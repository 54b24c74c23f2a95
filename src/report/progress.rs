//! Progress and ETA estimates
//!
//! The download pool reports at a fixed completion cadence. Estimates
//! extrapolate the observed per-item rate over the work left in this run
//! and over a configurable hypothetical run size.

use std::time::Duration;
use tracing::info;

/// Point-in-time view of download progress
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Items that have reached an outcome so far
    pub completed: u64,

    /// Items submitted to this run
    pub total: u64,

    /// Wall time since the run started
    pub elapsed: Duration,

    /// Time to finish the remaining items at the observed rate
    pub estimated_remaining: Duration,

    /// Time a run over the projection total would take at the observed rate
    pub projected_run: Duration,
}

impl ProgressSnapshot {
    /// Extrapolates from the completions observed so far
    ///
    /// Callers invoke this on completion events only, so `completed`
    /// is at least 1.
    pub fn compute(completed: u64, total: u64, elapsed: Duration, projection_total: u64) -> Self {
        let per_item = elapsed.as_secs_f64() / completed as f64;
        let remaining = total.saturating_sub(completed);

        ProgressSnapshot {
            completed,
            total,
            elapsed,
            estimated_remaining: Duration::from_secs_f64(per_item * remaining as f64),
            projected_run: Duration::from_secs_f64(per_item * projection_total as f64),
        }
    }

    pub fn remaining_hours(&self) -> f64 {
        self.estimated_remaining.as_secs_f64() / 3600.0
    }

    pub fn projected_hours(&self) -> f64 {
        self.projected_run.as_secs_f64() / 3600.0
    }
}

/// Emits progress reports at a fixed completion cadence
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    interval: u64,
    projection_total: u64,
}

impl ProgressReporter {
    /// # Arguments
    ///
    /// * `interval` - Completions between reports; must be >= 1
    /// * `projection_total` - Item count the projected-run estimate assumes
    pub fn new(interval: u64, projection_total: u64) -> Self {
        ProgressReporter {
            interval,
            projection_total,
        }
    }

    /// True when this completion count warrants a report
    ///
    /// Fires every `interval`-th completion and at the final one.
    pub fn should_report(&self, completed: u64, total: u64) -> bool {
        completed % self.interval == 0 || completed == total
    }

    /// Computes a snapshot for the current completion count and logs it
    pub fn report(&self, completed: u64, total: u64, elapsed: Duration) -> ProgressSnapshot {
        let snapshot = ProgressSnapshot::compute(completed, total, elapsed, self.projection_total);

        info!(
            completed = snapshot.completed,
            total = snapshot.total,
            "Completed {}/{}. Estimated remaining time: {:.2} hours",
            snapshot.completed,
            snapshot.total,
            snapshot.remaining_hours()
        );
        info!(
            "Estimated total time for {} items: {:.2} hours",
            self.projection_total,
            snapshot.projected_hours()
        );

        snapshot
    }
}
