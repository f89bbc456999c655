//! Summary records produced by the engine.
//!
//! [`ExperienceSummary`] is the persisted one-per-person row read by the
//! reporting and UI layers. [`HistoricalSummary`] is a display-only view of
//! the historical ledger alone.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The consolidated work experience of one person.
///
/// Every field other than `person_id` is derived from `total_days`:
/// `total_months == total_days / 30` and
/// `total_years == round(total_months / 12, 2)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    /// Canonical identifier of the person this summary belongs to.
    pub person_id: String,
    /// Merged worked days across both sources.
    pub total_days: i64,
    /// Whole 30-day months in `total_days`.
    pub total_months: i64,
    /// `total_months / 12`, rounded to two decimal places.
    pub total_years: Decimal,
    /// Human-readable duration, e.g. "1 años, 2 meses y 3 días".
    pub display_text: String,
}

/// Historical-ledger-only totals for display.
///
/// This ignores form-sourced intervals and is not the person's authoritative
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalSummary {
    /// Number of ledger rows for the person.
    pub count: usize,
    /// Merged days across the ledger rows.
    pub total_days: i64,
    /// Human-readable duration of `total_days`, empty when there are no rows.
    pub display_text: String,
    /// Whether the person has any ledger rows.
    pub has_records: bool,
}

impl HistoricalSummary {
    /// The summary returned when a person has no ledger rows.
    pub fn empty() -> Self {
        Self {
            count: 0,
            total_days: 0,
            display_text: String::new(),
            has_records: false,
        }
    }
}
