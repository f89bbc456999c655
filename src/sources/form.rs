//! In-memory person-record store.
//!
//! Holds the applicants and their form employment entries. Can be seeded from
//! a YAML file or programmatically, and updated in place when a form is
//! resubmitted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Interval, NationalId, PersonRecord};

use super::FormSource;

/// Person records keyed by canonical identifier.
///
/// # Example
///
/// ```
/// use experience_engine::models::{NationalId, PersonRecord};
/// use experience_engine::sources::{FormSource, PersonRecordStore};
///
/// let store = PersonRecordStore::from_records(vec![PersonRecord {
///     national_id: NationalId::from("1020"),
///     full_name: "Ana Pérez".to_string(),
///     employment: vec![],
/// }]);
///
/// let intervals = store.fetch_form_intervals(&NationalId::from(1020_i64)).unwrap();
/// assert!(intervals.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct PersonRecordStore {
    persons: RwLock<BTreeMap<String, PersonRecord>>,
}

impl PersonRecordStore {
    /// Creates a store from person records. A later record with the same
    /// canonical identifier replaces an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = PersonRecord>) -> Self {
        let mut persons = BTreeMap::new();
        for record in records {
            let key = record.national_id.canonical();
            if persons.insert(key.clone(), record).is_some() {
                warn!(person_id = %key, "Duplicate person record, keeping the last one");
            }
        }
        Self {
            persons: RwLock::new(persons),
        }
    }

    /// Loads person records from a YAML file holding a list of persons.
    pub fn load_yaml<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| EngineError::SourceLoadError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let records: Vec<PersonRecord> =
            serde_yaml::from_str(&content).map_err(|e| EngineError::SourceLoadError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        debug!(path = %path_str, persons = records.len(), "Loaded person records");
        Ok(Self::from_records(records))
    }

    /// Inserts or replaces a person's record.
    ///
    /// This is the hand-off point for the form collaborator: it commits the
    /// person's entries here and then triggers a recompute.
    pub fn upsert_person(&self, record: PersonRecord) {
        let key = record.national_id.canonical();
        self.persons
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, record);
    }

    /// Returns a copy of a person's record.
    pub fn get(&self, person_id: &NationalId) -> Option<PersonRecord> {
        self.persons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&person_id.canonical())
            .cloned()
    }

    /// Number of persons held.
    pub fn len(&self) -> usize {
        self.persons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when no person is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FormSource for PersonRecordStore {
    fn person_ids(&self) -> EngineResult<Vec<NationalId>> {
        Ok(self
            .persons
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|p| p.national_id.clone())
            .collect())
    }

    fn fetch_form_intervals(&self, person_id: &NationalId) -> EngineResult<Vec<Interval>> {
        self.get(person_id)
            .map(|p| p.form_intervals())
            .ok_or_else(|| EngineError::PersonNotFound {
                person_id: person_id.canonical(),
            })
    }
}
