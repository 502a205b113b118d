//! Single polling pass over the due set.
//!
//! A pass selects every due obligation once, then materializes each in
//! selector order. Failures are isolated per obligation: one bad item is
//! logged and skipped, the rest of the due set is still attempted. A
//! selector failure ends the pass early with nothing processed. Nothing
//! in a pass is fatal to the process.

use chrono::NaiveDate;
use log::{error, info};

use crate::store::DueStore;

/// What happened during one polling pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassSummary {
    /// Obligations returned by the selector
    pub selected: usize,
    /// Obligations successfully materialized
    pub processed: usize,
    /// Obligations whose materialization failed
    pub failed: usize,
    /// The selector itself failed; nothing was attempted
    pub selector_failed: bool,
}

impl PassSummary {
    fn selector_failure() -> Self {
        Self {
            selector_failed: true,
            ..Self::default()
        }
    }
}

/// Cumulative worker state across passes
#[derive(Debug, Default)]
pub struct WorkerState {
    /// Number of completed passes
    pub pass_count: u64,
    /// Total obligations materialized this session
    pub total_processed: u64,
    /// Total materialization failures this session
    pub total_failed: u64,
}

impl WorkerState {
    /// Create a new worker state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one pass into the running totals
    pub fn record(&mut self, summary: &PassSummary) {
        self.pass_count += 1;
        self.total_processed += summary.processed as u64;
        self.total_failed += summary.failed as u64;
    }
}

/// Run one pass: select the due set as of `today`, materialize each item.
///
/// Never returns an error; every failure is logged and folded into the
/// summary.
pub fn run_pass<S: DueStore>(store: &mut S, today: NaiveDate) -> PassSummary {
    let due = match store.select_due(today) {
        Ok(due) => due,
        Err(e) => {
            error!("Selector failed, skipping pass: {e}");
            return PassSummary::selector_failure();
        }
    };

    let mut summary = PassSummary {
        selected: due.len(),
        ..PassSummary::default()
    };

    for id in due {
        match store.materialize(id) {
            Ok(()) => {
                info!("Processed obligation_id={id}");
                summary.processed += 1;
            }
            Err(e) => {
                // Skipped item stays due and is retried next pass
                error!("Failed to process obligation_id={id}: {e}");
                summary.failed += 1;
            }
        }
    }

    summary
}
