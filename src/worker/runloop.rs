//! The polling loop.
//!
//! Pass, sleep, repeat. Passes never overlap: store calls run inline on
//! this task, one obligation at a time, and pass N+1 starts only after
//! pass N (including all its materializations) has finished. The stop
//! flag is checked before each pass and interrupts the sleep at its
//! boundary, so the loop exits only between passes.

use std::time::Duration;

use chrono::Local;
use log::{debug, info};

use crate::store::DueStore;
use crate::worker::pass::{WorkerState, run_pass};
use crate::worker::shutdown::ShutdownFlag;

/// Run the worker until `shutdown` is requested.
///
/// Every pass failure is logged and absorbed; only the shutdown flag ends
/// the loop. Returns the cumulative state for the session.
pub async fn run<S: DueStore>(
    mut store: S,
    interval: Duration,
    shutdown: ShutdownFlag,
) -> WorkerState {
    info!("Starting recurring worker (interval={}s)", interval.as_secs());

    let mut state = WorkerState::new();

    while !shutdown.is_requested() {
        let today = Local::now().date_naive();
        let summary = run_pass(&mut store, today);
        state.record(&summary);

        if summary.selected > 0 || summary.selector_failed {
            info!(
                "Pass {} complete: {} selected, {} processed, {} failed",
                state.pass_count, summary.selected, summary.processed, summary.failed
            );
        } else {
            debug!("Pass {} complete: nothing due", state.pass_count);
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.requested() => {}
        }
    }

    info!(
        "Worker stopped after {} passes ({} processed, {} failed)",
        state.pass_count, state.total_processed, state.total_failed
    );
    state
}
