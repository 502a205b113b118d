//! Store interfaces for the recurring worker.
//!
//! `DueStore` is the seam between the polling loop and the relational
//! store: the loop only ever selects due ids and triggers the atomic
//! materialize. Calls are blocking and executed synchronously within a
//! pass.

pub mod sqlite;

use chrono::NaiveDate;

use crate::error::Result;

pub use sqlite::ObligationStore;

/// The two store operations the polling loop depends on.
pub trait DueStore {
    /// Return the ids of every obligation with `is_active` set and
    /// `next_due_date <= today`, in store order. Empty when nothing is
    /// due; a store failure is an error to the caller, never swallowed.
    /// No side effects.
    fn select_due(&self, today: NaiveDate) -> Result<Vec<i64>>;

    /// Atomically record one transaction for the obligation and advance
    /// its `next_due_date` per its frequency. Both effects commit together
    /// or neither does.
    ///
    /// Not idempotent: invoking this twice before the date advances
    /// creates two transactions and advances the date twice. The loop's
    /// one-snapshot-per-pass discipline is the only in-process safeguard.
    fn materialize(&mut self, obligation_id: i64) -> Result<()>;
}
