//! Recurring worker - polling loop, pass processing, and shutdown
//!
//! The worker is the long-running process that:
//! - Polls the store for obligations whose next occurrence is due
//! - Materializes one transaction per due obligation
//! - Exits cleanly between passes on SIGINT/SIGTERM
//!
//! One worker per store. Running multiple instances against the same
//! database is unsupported: materialize is not idempotent, so concurrent
//! workers can double-process an obligation.

pub mod pass;
pub mod runloop;
pub mod shutdown;

pub use pass::{PassSummary, WorkerState, run_pass};
pub use runloop::run;
pub use shutdown::ShutdownFlag;
