//! Recurrence frequency and due-date arithmetic.
//!
//! `next_after` is the schedule-advance rule. It is only ever evaluated
//! inside the store's atomic materialize operation, never by the polling
//! loop itself.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::RecurdError;

/// How often an obligation recurs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// String form used in the database column
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    /// Compute the occurrence date that follows `date`.
    ///
    /// Always strictly later than `date`. Month-based units clamp to the
    /// last day of the target month (2024-01-31 monthly -> 2024-02-29).
    pub fn next_after(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Daily => date + Days::new(1),
            Frequency::Weekly => date + Days::new(7),
            Frequency::Biweekly => date + Days::new(14),
            Frequency::Monthly => date + Months::new(1),
            Frequency::Quarterly => date + Months::new(3),
            Frequency::Yearly => date + Months::new(12),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RecurdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(RecurdError::InvalidState(format!("unknown frequency: {other}"))),
        }
    }
}
