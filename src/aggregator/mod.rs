//! Experience aggregation.
//!
//! The [`ExperienceAggregator`] combines the form and historical interval
//! sources, merges the union, derives months, years and display text, and
//! upserts one summary per person.

mod batch;
mod locks;

pub use batch::{BatchReport, PersonOutcome};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculation::{ExperienceDuration, merge};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{
    ExperienceSummary, HistoricalSummary, MergedIntervalSet, NationalId, naive_total_days,
};
use crate::sources::{FormSource, HistoricalLedger, HistoricalSource, PersonRecordStore};
use crate::store::{JsonFileSummaryStore, SummaryStore};

use locks::PersonLocks;

/// Everything computed for one person before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBreakdown {
    /// Canonical identifier of the person.
    pub person_id: String,
    /// Complete form intervals taken into account.
    pub form_interval_count: usize,
    /// Ledger intervals taken into account.
    pub historical_interval_count: usize,
    /// Sum of interval days before overlap removal.
    pub naive_days: i64,
    /// The merged covering set of both sources.
    pub merged: MergedIntervalSet,
    /// Days removed because intervals overlapped.
    pub overlap_days: i64,
    /// The derived summary.
    pub summary: ExperienceSummary,
}

/// Consolidates a person's experience and owns the summary store writes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use experience_engine::aggregator::ExperienceAggregator;
/// use experience_engine::models::{NationalId, PersonRecord};
/// use experience_engine::sources::{HistoricalLedger, PersonRecordStore};
/// use experience_engine::store::InMemorySummaryStore;
///
/// let persons = PersonRecordStore::from_records(vec![PersonRecord {
///     national_id: NationalId::from(1_i64),
///     full_name: "Ana Pérez".to_string(),
///     employment: vec![],
/// }]);
/// let aggregator = ExperienceAggregator::new(
///     Arc::new(persons),
///     Arc::new(HistoricalLedger::default()),
///     Arc::new(InMemorySummaryStore::new()),
/// );
///
/// let summary = aggregator.recompute_experience(&NationalId::from("1")).unwrap();
/// assert_eq!(summary.total_days, 0);
/// assert_eq!(summary.display_text, "0 años y 0 meses");
/// ```
pub struct ExperienceAggregator {
    form: Arc<dyn FormSource>,
    historical: Arc<dyn HistoricalSource>,
    store: Arc<dyn SummaryStore>,
    locks: PersonLocks,
}

impl ExperienceAggregator {
    /// Creates an aggregator over the given sources and store.
    pub fn new(
        form: Arc<dyn FormSource>,
        historical: Arc<dyn HistoricalSource>,
        store: Arc<dyn SummaryStore>,
    ) -> Self {
        Self {
            form,
            historical,
            store,
            locks: PersonLocks::default(),
        }
    }

    /// Opens the file-backed sources and store named by the configuration.
    pub fn from_config(config: &ConfigLoader) -> EngineResult<Self> {
        let persons = PersonRecordStore::load_yaml(config.persons_path())?;
        let ledger = HistoricalLedger::load_csv(config.ledger_path())?;
        let store = JsonFileSummaryStore::open(config.summaries_path())?;

        info!(
            persons = persons.len(),
            ledger_persons = ledger.person_count(),
            summaries = %config.summaries_path().display(),
            "Opened experience data"
        );

        Ok(Self::new(Arc::new(persons), Arc::new(ledger), Arc::new(store)))
    }

    /// Computes a person's experience without persisting it.
    ///
    /// Fetches both sources, merges their union, and derives the summary.
    ///
    /// # Errors
    ///
    /// - `PersonNotFound` if the form source has no record for the person
    /// - `InvalidInterval` if any interval from either source is reversed
    pub fn compute_experience(&self, person_id: &NationalId) -> EngineResult<ExperienceBreakdown> {
        let person_key = person_id.canonical();

        let form_intervals = self.form.fetch_form_intervals(person_id)?;
        let historical_intervals = self.historical.fetch_historical_intervals(person_id)?;

        let form_interval_count = form_intervals.len();
        let historical_interval_count = historical_intervals.len();

        let mut all_intervals = form_intervals;
        all_intervals.extend(historical_intervals);

        let naive_days = naive_total_days(&all_intervals);
        let merged = merge(&all_intervals)?;
        let summary = ExperienceDuration::from_days(merged.total_days()).to_summary(&person_key);

        debug!(
            person_id = %person_key,
            form_intervals = form_interval_count,
            historical_intervals = historical_interval_count,
            merged_intervals = merged.len(),
            naive_days,
            total_days = merged.total_days(),
            "Computed experience"
        );

        Ok(ExperienceBreakdown {
            person_id: person_key,
            form_interval_count,
            historical_interval_count,
            naive_days,
            overlap_days: naive_days - merged.total_days(),
            merged,
            summary,
        })
    }

    /// Recomputes a person's experience and upserts the summary row.
    ///
    /// Concurrent calls for the same person are serialized from the first
    /// source read through the store write. On any error the previously
    /// stored summary is left untouched.
    pub fn recompute_experience(&self, person_id: &NationalId) -> EngineResult<ExperienceSummary> {
        let person_key = person_id.canonical();
        let claim = self.locks.acquire(&person_key);
        let _guard = claim.lock();

        let breakdown = self.compute_experience(person_id)?;
        let outcome = self.store.upsert(&breakdown.summary)?;

        info!(
            person_id = %person_key,
            total_days = breakdown.summary.total_days,
            total_months = breakdown.summary.total_months,
            overlap_days = breakdown.overlap_days,
            outcome = ?outcome,
            "Experience summary committed"
        );

        Ok(breakdown.summary)
    }

    /// Recomputes every person known to the form source.
    ///
    /// A failure for one person is recorded in the report and does not stop
    /// the batch. Only a failure to list persons aborts the run.
    pub fn recompute_all(&self) -> EngineResult<BatchReport> {
        let person_ids = self.form.person_ids()?;
        info!(persons = person_ids.len(), "Starting batch recompute");

        let mut report = BatchReport::default();
        for person_id in &person_ids {
            let result = self.recompute_experience(person_id);
            if let Err(err) = &result {
                warn!(person_id = %person_id, error = %err, "Recompute failed");
            }
            report.outcomes.push(PersonOutcome {
                person_id: person_id.canonical(),
                result,
            });
        }

        info!(
            processed = report.processed(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch recompute finished"
        );
        Ok(report)
    }

    /// Reads a person's stored summary. `None` means no experience has been
    /// calculated yet.
    pub fn summary(&self, person_id: &NationalId) -> EngineResult<Option<ExperienceSummary>> {
        self.store.get(&person_id.canonical())
    }

    /// Historical-ledger-only totals for display.
    pub fn historical_summary(&self, person_id: &NationalId) -> EngineResult<HistoricalSummary> {
        self.historical.fetch_historical_summary(person_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{EmploymentRecord, HistoricalContractRecord, PersonRecord};
    use crate::sources::{HistoricalLedger, PersonRecordStore};
    use crate::store::{InMemorySummaryStore, UpsertOutcome};
    use chrono::NaiveDate;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn job(start: &str, end: &str) -> EmploymentRecord {
        EmploymentRecord {
            employer: "Secretaría de Salud".to_string(),
            position: None,
            start_date: Some(make_date(start)),
            end_date: Some(make_date(end)),
        }
    }

    fn person(id: i64, employment: Vec<EmploymentRecord>) -> PersonRecord {
        PersonRecord {
            national_id: NationalId::from(id),
            full_name: format!("Persona {}", id),
            employment,
        }
    }

    fn contract(id: i64, start: &str, end: &str) -> HistoricalContractRecord {
        HistoricalContractRecord {
            person_id: NationalId::from(id.to_string()),
            start_date: make_date(start),
            end_date: make_date(end),
            gross_days: None,
            net_contributed_days: None,
            overlap_flag: false,
            note: None,
        }
    }

    struct Fixture {
        persons: Arc<PersonRecordStore>,
        store: Arc<InMemorySummaryStore>,
        aggregator: ExperienceAggregator,
    }

    fn fixture(persons: Vec<PersonRecord>, contracts: Vec<HistoricalContractRecord>) -> Fixture {
        let persons = Arc::new(PersonRecordStore::from_records(persons));
        let store = Arc::new(InMemorySummaryStore::new());
        let aggregator = ExperienceAggregator::new(
            persons.clone(),
            Arc::new(HistoricalLedger::from_records(contracts)),
            store.clone(),
        );
        Fixture {
            persons,
            store,
            aggregator,
        }
    }

    /// A store whose writes always fail.
    struct FailingStore;

    impl SummaryStore for FailingStore {
        fn get(&self, _person_id: &str) -> EngineResult<Option<ExperienceSummary>> {
            Ok(None)
        }

        fn upsert(&self, _summary: &ExperienceSummary) -> EngineResult<UpsertOutcome> {
            Err(EngineError::PersistenceFailure {
                message: "storage unavailable".to_string(),
            })
        }

        fn all(&self) -> EngineResult<Vec<ExperienceSummary>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_zero_intervals_yield_zero_summary() {
        let f = fixture(vec![person(1, vec![])], vec![]);

        let summary = f.aggregator.recompute_experience(&NationalId::from(1_i64)).unwrap();
        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.total_months, 0);
        assert!(summary.total_years.is_zero());
        assert_eq!(summary.display_text, "0 años y 0 meses");
    }

    #[test]
    fn test_form_only_disjoint_halves() {
        let f = fixture(
            vec![person(
                1,
                vec![job("2019-01-01", "2019-06-30"), job("2019-07-01", "2019-12-31")],
            )],
            vec![],
        );

        let summary = f.aggregator.recompute_experience(&NationalId::from(1_i64)).unwrap();
        assert_eq!(summary.total_days, 365);
        assert_eq!(summary.total_months, 12);
        assert_eq!(summary.display_text, "1 años y 0 meses");
    }

    #[test]
    fn test_cross_source_overlap_removed() {
        let f = fixture(
            vec![person(1, vec![job("2019-06-01", "2019-08-31")])],
            vec![
                contract(1, "2019-01-01", "2019-06-30"),
                contract(1, "2019-07-01", "2019-12-31"),
            ],
        );

        let breakdown = f.aggregator.compute_experience(&NationalId::from(1_i64)).unwrap();
        assert_eq!(breakdown.form_interval_count, 1);
        assert_eq!(breakdown.historical_interval_count, 2);
        assert_eq!(breakdown.naive_days, 457);
        assert_eq!(breakdown.summary.total_days, 365);
        assert_eq!(breakdown.overlap_days, 92);
    }

    #[test]
    fn test_compute_does_not_persist() {
        let f = fixture(vec![person(1, vec![job("2020-01-01", "2020-01-31")])], vec![]);

        f.aggregator.compute_experience(&NationalId::from(1_i64)).unwrap();
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let f = fixture(
            vec![person(1, vec![job("2018-02-01", "2019-03-15")])],
            vec![contract(1, "2016-01-01", "2016-12-31")],
        );
        let id = NationalId::from("1");

        let first = f.aggregator.recompute_experience(&id).unwrap();
        let second = f.aggregator.recompute_experience(&id).unwrap();

        assert_eq!(first, second);
        assert_eq!(f.store.len(), 1);
        assert_eq!(f.aggregator.summary(&id).unwrap(), Some(second));
    }

    #[test]
    fn test_recompute_replaces_rather_than_accumulates() {
        let f = fixture(vec![person(1, vec![job("2020-01-01", "2020-12-31")])], vec![]);
        let id = NationalId::from(1_i64);

        f.aggregator.recompute_experience(&id).unwrap();
        f.persons
            .upsert_person(person(1, vec![job("2020-01-01", "2020-01-31")]));
        let summary = f.aggregator.recompute_experience(&id).unwrap();

        assert_eq!(summary.total_days, 31);
        assert_eq!(f.store.len(), 1);
    }

    #[test]
    fn test_invalid_interval_leaves_prior_summary() {
        let f = fixture(vec![person(1, vec![job("2020-01-01", "2020-06-30")])], vec![]);
        let id = NationalId::from(1_i64);

        let prior = f.aggregator.recompute_experience(&id).unwrap();
        f.persons.upsert_person(person(
            1,
            vec![job("2020-01-01", "2020-06-30"), job("2021-05-01", "2021-04-01")],
        ));

        let result = f.aggregator.recompute_experience(&id);
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
        assert_eq!(f.aggregator.summary(&id).unwrap(), Some(prior));
    }

    #[test]
    fn test_invalid_historical_interval_rejected() {
        let f = fixture(
            vec![person(1, vec![])],
            vec![contract(1, "2015-12-31", "2015-01-01")],
        );

        let result = f.aggregator.recompute_experience(&NationalId::from(1_i64));
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_unknown_person_not_found() {
        let f = fixture(vec![], vec![contract(9, "2015-01-01", "2015-12-31")]);

        let result = f.aggregator.recompute_experience(&NationalId::from(9_i64));
        assert!(matches!(result, Err(EngineError::PersonNotFound { .. })));
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_lock_registry_released_after_recompute() {
        let f = fixture(vec![person(1, vec![job("2019-01-01", "2019-12-31")])], vec![]);

        f.aggregator.recompute_experience(&NationalId::from(1_i64)).unwrap();
        assert_eq!(f.aggregator.locks.len(), 0);

        for i in 0..10_000 {
            let result = f
                .aggregator
                .recompute_experience(&NationalId::from(format!("unknown-{}", i)));
            assert!(matches!(result, Err(EngineError::PersonNotFound { .. })));
        }
        assert_eq!(f.aggregator.locks.len(), 0);
    }

    #[test]
    fn test_persistence_failure_surfaces() {
        let persons = PersonRecordStore::from_records(vec![person(1, vec![])]);
        let aggregator = ExperienceAggregator::new(
            Arc::new(persons),
            Arc::new(HistoricalLedger::default()),
            Arc::new(FailingStore),
        );

        let result = aggregator.recompute_experience(&NationalId::from(1_i64));
        assert!(matches!(result, Err(EngineError::PersistenceFailure { .. })));
    }

    #[test]
    fn test_recompute_all_isolates_failures() {
        let f = fixture(
            vec![
                person(1, vec![job("2020-01-01", "2020-01-31")]),
                person(2, vec![job("2020-05-01", "2020-04-01")]),
                person(3, vec![]),
            ],
            vec![],
        );

        let report = f.aggregator.recompute_all().unwrap();
        assert_eq!(report.processed(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.outcomes[1].person_id, "2");
        assert!(!report.outcomes[1].is_success());
        assert_eq!(f.store.len(), 2);
    }

    #[test]
    fn test_historical_summary_ignores_form() {
        let f = fixture(
            vec![person(1, vec![job("2000-01-01", "2009-12-31")])],
            vec![contract(1, "2019-01-01", "2019-01-30")],
        );

        let summary = f
            .aggregator
            .historical_summary(&NationalId::from(1_i64))
            .unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.total_days, 30);
        assert_eq!(summary.display_text, "0 años y 1 meses");
    }

    #[test]
    fn test_concurrent_recompute_same_person() {
        let f = fixture(
            vec![person(1, vec![job("2019-06-01", "2019-08-31")])],
            vec![contract(1, "2019-01-01", "2019-12-31")],
        );
        let aggregator = Arc::new(f.aggregator);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aggregator = aggregator.clone();
                std::thread::spawn(move || {
                    aggregator
                        .recompute_experience(&NationalId::from("1"))
                        .unwrap()
                })
            })
            .collect();

        let results: Vec<ExperienceSummary> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(results.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(f.store.len(), 1);
        assert_eq!(f.store.get("1").unwrap().unwrap().total_days, 365);
        assert_eq!(aggregator.locks.len(), 0);
    }
}
