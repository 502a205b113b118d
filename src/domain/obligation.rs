//! Obligation and transaction records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Frequency;

/// A recurring financial obligation with a schedule.
///
/// Created and deactivated by collaborators outside the worker; the worker
/// only reads `is_active`/`next_due_date` and triggers the atomic advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringObligation {
    /// Row id, assigned by the store
    pub id: i64,
    /// Human-readable label, opaque to the worker
    pub description: String,
    /// Amount per occurrence, opaque to the worker
    pub amount: f64,
    /// Recurrence unit, interpreted only inside the store's materialize
    pub frequency: Frequency,
    /// First scheduled date
    pub start_date: NaiveDate,
    /// Next date this obligation becomes due; strictly advances on each
    /// successful materialization
    pub next_due_date: NaiveDate,
    /// Only active obligations are eligible for processing
    pub is_active: bool,
}

impl RecurringObligation {
    /// Whether this obligation is due as of `today`.
    ///
    /// Date granularity only; there is no time-of-day component.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_due_date <= today
    }
}

/// One materialized occurrence of an obligation.
///
/// Rows are created only by the store's atomic materialize operation,
/// exactly one per successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligationTransaction {
    /// Row id, assigned by the store
    pub id: i64,
    /// The obligation this occurrence belongs to
    pub obligation_id: i64,
    /// Amount copied from the obligation at materialization time
    pub amount: f64,
    /// The due date this occurrence was materialized for
    pub posted_on: NaiveDate,
}
