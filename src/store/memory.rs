//! In-memory summary store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::ExperienceSummary;

use super::{SummaryStore, UpsertOutcome};

/// Summary rows held in a process-local map.
#[derive(Debug, Default)]
pub struct InMemorySummaryStore {
    rows: RwLock<BTreeMap<String, ExperienceSummary>>,
}

impl InMemorySummaryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Returns true when no row is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> EngineError {
    EngineError::PersistenceFailure {
        message: "summary store lock poisoned".to_string(),
    }
}

impl SummaryStore for InMemorySummaryStore {
    fn get(&self, person_id: &str) -> EngineResult<Option<ExperienceSummary>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(person_id).cloned())
    }

    fn upsert(&self, summary: &ExperienceSummary) -> EngineResult<UpsertOutcome> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;
        match rows.insert(summary.person_id.clone(), summary.clone()) {
            Some(_) => Ok(UpsertOutcome::Updated),
            None => Ok(UpsertOutcome::Created),
        }
    }

    fn all(&self) -> EngineResult<Vec<ExperienceSummary>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }
}
