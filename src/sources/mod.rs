//! Read-only interval sources.
//!
//! The aggregator reads from two independent sources: the live form records
//! and the historical contract ledger. Both are traits so that the engine can
//! run against in-memory fixtures, the bundled file loaders, or any other
//! store that honors the same contracts.

mod form;
mod historical;

pub use form::PersonRecordStore;
pub use historical::HistoricalLedger;

use crate::calculation::{historical_summary, merge};
use crate::error::EngineResult;
use crate::models::{HistoricalSummary, Interval, NationalId};

/// Person records entered through the live application form.
pub trait FormSource: Send + Sync {
    /// Every known person, in a stable order.
    fn person_ids(&self) -> EngineResult<Vec<NationalId>>;

    /// The person's complete employment intervals ordered by start date.
    ///
    /// Records missing a start or end date are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PersonNotFound`](crate::error::EngineError::PersonNotFound)
    /// when there is no record for the identifier.
    fn fetch_form_intervals(&self, person_id: &NationalId) -> EngineResult<Vec<Interval>>;
}

/// The historical ledger of past contracts.
///
/// A person with no ledger rows is a normal case and must produce an empty
/// result, never an error.
pub trait HistoricalSource: Send + Sync {
    /// The person's ledger intervals ordered by start date, unmerged.
    ///
    /// Identifiers that do not integer-parse yield an empty list.
    fn fetch_historical_intervals(&self, person_id: &NationalId) -> EngineResult<Vec<Interval>>;

    /// Historical-only totals for display, merged within the ledger alone.
    fn fetch_historical_summary(&self, person_id: &NationalId) -> EngineResult<HistoricalSummary> {
        let intervals = self.fetch_historical_intervals(person_id)?;
        let merged = merge(&intervals)?;
        Ok(historical_summary(intervals.len(), merged.total_days()))
    }
}
