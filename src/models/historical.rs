//! Historical ledger contract records.
//!
//! Rows of the ledger imported from the legacy contracts spreadsheet. The
//! import job owns these; the engine only reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Interval, NationalId};

/// One past contract from the historical ledger.
///
/// Only `start_date` and `end_date` take part in merging. The day counts and
/// overlap flag were computed by the import job and are carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalContractRecord {
    /// The person the contract belongs to.
    pub person_id: NationalId,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract.
    pub end_date: NaiveDate,
    /// Days between start and end as recorded by the import.
    #[serde(default)]
    pub gross_days: Option<i64>,
    /// Days this contract adds once overlap inside the ledger is removed.
    #[serde(default)]
    pub net_contributed_days: Option<i64>,
    /// Whether the import found this contract overlapping another ledger row.
    #[serde(default)]
    pub overlap_flag: bool,
    /// Free-text remark from the spreadsheet.
    #[serde(default)]
    pub note: Option<String>,
}

impl HistoricalContractRecord {
    /// The contract period as an interval.
    pub fn interval(&self) -> Interval {
        Interval::new(self.start_date, self.end_date)
    }
}
