//! JSON file summary store.
//!
//! The whole table lives in one JSON file. A write serializes the updated
//! table to a sibling temporary file and renames it over the target, so the
//! file on disk is always either the old table or the new one.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::ExperienceSummary;

use super::{SummaryStore, UpsertOutcome};

/// Summary rows persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileSummaryStore {
    path: PathBuf,
    rows: RwLock<BTreeMap<String, ExperienceSummary>>,
}

impl JsonFileSummaryStore {
    /// Opens the store at `path`. A missing file is an empty store; it is
    /// created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();

        let rows = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| persistence(&path, e))?;
            let summaries: Vec<ExperienceSummary> =
                serde_json::from_str(&content).map_err(|e| persistence(&path, e))?;
            summaries
                .into_iter()
                .map(|s| (s.person_id.clone(), s))
                .collect()
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), rows = rows.len(), "Opened summary store");
        Ok(Self {
            path,
            rows: RwLock::new(rows),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_table(&self, rows: &BTreeMap<String, ExperienceSummary>) -> EngineResult<()> {
        let summaries: Vec<&ExperienceSummary> = rows.values().collect();
        let json = serde_json::to_string_pretty(&summaries).map_err(|e| persistence(&self.path, e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persistence(&self.path, e))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(|e| persistence(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| persistence(&self.path, e))?;
        Ok(())
    }
}

fn persistence(path: &Path, error: impl std::fmt::Display) -> EngineError {
    EngineError::PersistenceFailure {
        message: format!("{}: {}", path.display(), error),
    }
}

fn poisoned() -> EngineError {
    EngineError::PersistenceFailure {
        message: "summary store lock poisoned".to_string(),
    }
}

impl SummaryStore for JsonFileSummaryStore {
    fn get(&self, person_id: &str) -> EngineResult<Option<ExperienceSummary>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.get(person_id).cloned())
    }

    fn upsert(&self, summary: &ExperienceSummary) -> EngineResult<UpsertOutcome> {
        let mut rows = self.rows.write().map_err(|_| poisoned())?;

        let mut next = rows.clone();
        let outcome = match next.insert(summary.person_id.clone(), summary.clone()) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        };

        // Only publish in memory once the file is committed.
        self.write_table(&next)?;
        *rows = next;
        Ok(outcome)
    }

    fn all(&self) -> EngineResult<Vec<ExperienceSummary>> {
        let rows = self.rows.read().map_err(|_| poisoned())?;
        Ok(rows.values().cloned().collect())
    }
}
