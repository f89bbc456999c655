//! Historical contract ledger.
//!
//! The ledger is imported once from the legacy spreadsheet and never edited
//! through the form. Rows are keyed by the integer form of the person's
//! identifier.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{HistoricalContractRecord, Interval, NationalId};

use super::HistoricalSource;

/// Read-only ledger of past contracts.
#[derive(Debug, Default, Clone)]
pub struct HistoricalLedger {
    contracts: HashMap<i64, Vec<HistoricalContractRecord>>,
}

/// One CSV row as exported from the spreadsheet.
#[derive(Debug, Deserialize)]
struct LedgerRow {
    person_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    gross_days: Option<i64>,
    net_contributed_days: Option<i64>,
    overlap_flag: Option<String>,
    note: Option<String>,
}

impl From<LedgerRow> for HistoricalContractRecord {
    fn from(row: LedgerRow) -> Self {
        HistoricalContractRecord {
            person_id: NationalId::from(row.person_id),
            start_date: row.start_date,
            end_date: row.end_date,
            gross_days: row.gross_days,
            net_contributed_days: row.net_contributed_days,
            overlap_flag: row.overlap_flag.as_deref().is_some_and(parse_flag),
            note: row.note,
        }
    }
}

/// Spreadsheet truthy markers.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "x" | "yes" | "si" | "sí"
    )
}

impl HistoricalLedger {
    /// Builds a ledger from contract records.
    ///
    /// Rows whose person identifier does not integer-parse can never be looked
    /// up and are dropped with a warning.
    pub fn from_records(records: impl IntoIterator<Item = HistoricalContractRecord>) -> Self {
        let mut contracts: HashMap<i64, Vec<HistoricalContractRecord>> = HashMap::new();
        for record in records {
            match record.person_id.as_number() {
                Some(key) => contracts.entry(key).or_default().push(record),
                None => warn!(
                    person_id = %record.person_id,
                    "Skipping ledger row with non-numeric person identifier"
                ),
            }
        }
        for rows in contracts.values_mut() {
            rows.sort_by_key(|r| r.start_date);
        }
        Self { contracts }
    }

    /// Loads the ledger from a CSV export.
    ///
    /// Expected header:
    /// `person_id,start_date,end_date,gross_days,net_contributed_days,overlap_flag,note`.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| EngineError::SourceLoadError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        let mut records = Vec::new();
        for row in reader.deserialize::<LedgerRow>() {
            let row = row.map_err(|e| EngineError::SourceLoadError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;
            records.push(HistoricalContractRecord::from(row));
        }

        debug!(path = %path_str, rows = records.len(), "Loaded historical ledger");
        Ok(Self::from_records(records))
    }

    /// The person's ledger rows ordered by start date.
    pub fn contracts_for(&self, person_id: &NationalId) -> &[HistoricalContractRecord] {
        person_id
            .as_number()
            .and_then(|key| self.contracts.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of persons with at least one ledger row.
    pub fn person_count(&self) -> usize {
        self.contracts.len()
    }
}

impl HistoricalSource for HistoricalLedger {
    fn fetch_historical_intervals(&self, person_id: &NationalId) -> EngineResult<Vec<Interval>> {
        Ok(self
            .contracts_for(person_id)
            .iter()
            .map(HistoricalContractRecord::interval)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn contract(person_id: NationalId, start: &str, end: &str) -> HistoricalContractRecord {
        HistoricalContractRecord {
            person_id,
            start_date: make_date(start),
            end_date: make_date(end),
            gross_days: None,
            net_contributed_days: None,
            overlap_flag: false,
            note: None,
        }
    }

    fn sample_ledger() -> HistoricalLedger {
        HistoricalLedger::from_records(vec![
            contract(NationalId::from("1020"), "2019-07-01", "2019-12-31"),
            contract(NationalId::from(1020_i64), "2019-01-01", "2019-06-30"),
            contract(NationalId::from("3030"), "2010-01-01", "2010-12-31"),
        ])
    }

    #[test]
    fn test_intervals_ordered_by_start_date() {
        let intervals = sample_ledger()
            .fetch_historical_intervals(&NationalId::from(1020_i64))
            .unwrap();

        assert_eq!(
            intervals,
            vec![
                Interval::new(make_date("2019-01-01"), make_date("2019-06-30")),
                Interval::new(make_date("2019-07-01"), make_date("2019-12-31")),
            ]
        );
    }

    #[test]
    fn test_string_and_integer_identifiers_match() {
        let ledger = sample_ledger();
        let by_text = ledger
            .fetch_historical_intervals(&NationalId::from(" 1020 "))
            .unwrap();
        let by_number = ledger
            .fetch_historical_intervals(&NationalId::from(1020_i64))
            .unwrap();
        assert_eq!(by_text, by_number);
    }

    #[test]
    fn test_non_numeric_identifier_yields_empty() {
        let intervals = sample_ledger()
            .fetch_historical_intervals(&NationalId::from("abc"))
            .unwrap();
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_unknown_identifier_yields_empty() {
        let ledger = sample_ledger();
        assert!(
            ledger
                .fetch_historical_intervals(&NationalId::from(999_i64))
                .unwrap()
                .is_empty()
        );
        assert!(!ledger.fetch_historical_summary(&NationalId::from(999_i64)).unwrap().has_records);
    }

    #[test]
    fn test_summary_merges_ledger_rows() {
        let summary = sample_ledger()
            .fetch_historical_summary(&NationalId::from("1020"))
            .unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_days, 365);
        assert!(summary.has_records);
        assert_eq!(summary.display_text, "1 años y 0 meses");
    }

    #[test]
    fn test_summary_counts_overlapping_rows_once() {
        let ledger = HistoricalLedger::from_records(vec![
            contract(NationalId::from(1_i64), "2021-01-01", "2021-01-31"),
            contract(NationalId::from(1_i64), "2021-01-15", "2021-02-14"),
        ]);

        let summary = ledger.fetch_historical_summary(&NationalId::from(1_i64)).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_days, 45);
        assert_eq!(summary.display_text, "0 años, 1 meses y 15 días");
    }

    #[test]
    fn test_non_numeric_rows_dropped() {
        let ledger = HistoricalLedger::from_records(vec![contract(
            NationalId::from("N/A"),
            "2021-01-01",
            "2021-01-31",
        )]);
        assert_eq!(ledger.person_count(), 0);
    }

    #[test]
    fn test_load_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "person_id,start_date,end_date,gross_days,net_contributed_days,overlap_flag,note\n\
             1020,2019-01-01,2019-06-30,181,181,NO,\n\
             1020, 2019-06-15 ,2019-12-31,200,184,SI,Traslape con contrato anterior\n\
             3030,2010-01-01,2010-12-31,,,,\n"
        )
        .unwrap();

        let ledger = HistoricalLedger::load_csv(file.path()).unwrap();
        assert_eq!(ledger.person_count(), 2);

        let rows = ledger.contracts_for(&NationalId::from(1020_i64));
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].overlap_flag);
        assert!(rows[1].overlap_flag);
        assert_eq!(rows[1].net_contributed_days, Some(184));
        assert_eq!(rows[1].note.as_deref(), Some("Traslape con contrato anterior"));

        let other = ledger.contracts_for(&NationalId::from(3030_i64));
        assert_eq!(other[0].gross_days, None);
    }

    #[test]
    fn test_load_csv_bad_date() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "person_id,start_date,end_date,gross_days,net_contributed_days,overlap_flag,note\n\
             1020,01/02/2019,2019-06-30,,,,\n"
        )
        .unwrap();

        let result = HistoricalLedger::load_csv(file.path());
        assert!(matches!(result, Err(EngineError::SourceLoadError { .. })));
    }

    #[test]
    fn test_load_csv_missing_file() {
        let result = HistoricalLedger::load_csv("/nonexistent/ledger.csv");
        assert!(matches!(result, Err(EngineError::SourceLoadError { .. })));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("SI"));
        assert!(parse_flag(" true "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("NO"));
        assert!(!parse_flag(""));
    }
}
