//! Per-person write serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Hands out one mutex per person key.
///
/// Recomputations for the same person take the same mutex; different persons
/// never contend beyond the brief lookup in the registry. An entry lives only
/// while some [`PersonLock`] for it exists.
#[derive(Debug, Default)]
pub(crate) struct PersonLocks {
    registry: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// A claim on one person's mutex. Dropping the last claim evicts the entry.
pub(crate) struct PersonLock<'a> {
    locks: &'a PersonLocks,
    key: String,
    mutex: Arc<Mutex<()>>,
}

impl PersonLocks {
    /// Claims the mutex guarding `person_key`, creating it on first use.
    pub(crate) fn acquire(&self, person_key: &str) -> PersonLock<'_> {
        let mutex = self
            .registry()
            .entry(person_key.to_string())
            .or_default()
            .clone();
        PersonLock {
            locks: self,
            key: person_key.to_string(),
            mutex,
        }
    }

    /// Number of persons with a live claim.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.registry().len()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        // Entries are only inserted or removed whole, so a poisoned guard
        // still holds a consistent map.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersonLock<'_> {
    /// Blocks until this person's mutex is held.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        // Guards no data of its own, so poisoning carries no broken state.
        self.mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PersonLock<'_> {
    fn drop(&mut self) {
        let mut registry = self.locks.registry();
        // Clones are only made under the registry lock, so a count of two
        // (the registry and this claim) cannot rise while it is held.
        if Arc::strong_count(&self.mutex) == 2 {
            registry.remove(&self.key);
        }
    }
}
