//! Statistics for sync runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::walker::{WalkOutcome, WalkStatus};

/// Statistics collected during a sync run.
///
/// A run that returns `Ok` may still be partial: failed containers and
/// rejected deliveries only show up here and in the logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStats {
    /// When the sync started
    pub started_at: Option<DateTime<Utc>>,

    /// When the sync completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Containers in the resolved set
    pub containers_resolved: usize,

    /// Containers whose listing ran to the end
    pub containers_completed: usize,

    /// Containers whose walk stopped on a page failure
    pub containers_failed: usize,

    /// Pages handed to the sink
    pub pages_delivered: usize,

    /// Descriptors handed to the sink
    pub objects_delivered: usize,

    /// Deliveries the sink reported as failed
    pub deliveries_rejected: usize,

    /// Whether the payload had to be (partly) replaced by defaults
    pub config_defaulted: bool,

    /// Whether the run was cancelled before finishing
    pub cancelled: bool,

    /// Contained errors encountered during the run
    pub errors: Vec<String>,
}

impl SyncStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the sync as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Fold one container walk into the totals.
    pub fn record_walk(&mut self, outcome: &WalkOutcome) {
        self.pages_delivered += outcome.pages_delivered;
        self.objects_delivered += outcome.objects_delivered;
        self.deliveries_rejected += outcome.deliveries_rejected;

        if outcome.deliveries_rejected > 0 {
            self.record_error(format!(
                "{} deliveries rejected for {}",
                outcome.deliveries_rejected, outcome.container
            ));
        }

        match &outcome.status {
            WalkStatus::Completed => self.containers_completed += 1,
            WalkStatus::Failed { page, error } => {
                self.containers_failed += 1;
                self.record_error(format!(
                    "Listing {} stopped at page {}: {}",
                    outcome.container, page, error
                ));
            }
            WalkStatus::Cancelled => self.cancelled = true,
        }
    }

    /// Record an error.
    pub fn record_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// Get the duration of the sync run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Calculate the throughput in descriptors per second.
    pub fn objects_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.objects_delivered as f64 / secs
            } else {
                0.0
            }
        })
    }
}
