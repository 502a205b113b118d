//! Domain types for recurring obligations
//!
//! The worker itself only ever looks at an obligation's id, `is_active`
//! flag, and `next_due_date`; the rest of the record belongs to the store
//! and to whoever manages obligations outside this process.

pub mod frequency;
pub mod obligation;

pub use frequency::Frequency;
pub use obligation::{ObligationTransaction, RecurringObligation};
