//! Summary persistence.
//!
//! One [`ExperienceSummary`](crate::models::ExperienceSummary) row per person.
//! Only the aggregator writes; reporting and UI layers read. Every write
//! replaces a whole row in one step, so readers never observe a partially
//! updated summary.

mod file;
mod memory;

pub use file::JsonFileSummaryStore;
pub use memory::InMemorySummaryStore;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::ExperienceSummary;

/// Whether an upsert created a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No row existed for the person.
    Created,
    /// The existing row was overwritten.
    Updated,
}

/// Storage for experience summaries keyed by canonical person identifier.
pub trait SummaryStore: Send + Sync {
    /// Reads a person's summary. `None` means no experience has been calculated.
    fn get(&self, person_id: &str) -> EngineResult<Option<ExperienceSummary>>;

    /// Creates or fully replaces the row for `summary.person_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PersistenceFailure`](crate::error::EngineError::PersistenceFailure)
    /// when the write cannot be committed. The previous row, if any, is left
    /// in place.
    fn upsert(&self, summary: &ExperienceSummary) -> EngineResult<UpsertOutcome>;

    /// All stored summaries ordered by person identifier.
    fn all(&self) -> EngineResult<Vec<ExperienceSummary>>;
}
