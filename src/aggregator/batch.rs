//! Batch recomputation report.

use crate::error::EngineResult;
use crate::models::ExperienceSummary;

/// The result of recomputing one person inside a batch.
#[derive(Debug)]
pub struct PersonOutcome {
    /// Canonical identifier of the person.
    pub person_id: String,
    /// The committed summary, or the error that stopped this person.
    pub result: EngineResult<ExperienceSummary>,
}

impl PersonOutcome {
    /// Returns true if the person's summary was committed.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-person outcomes of a batch run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per processed person.
    pub outcomes: Vec<PersonOutcome>,
}

impl BatchReport {
    /// Number of persons attempted.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of persons whose summary was committed.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of persons that failed.
    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    /// Returns true when every person succeeded.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}
