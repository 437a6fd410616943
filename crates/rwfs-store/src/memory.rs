//! In-memory record store for tests and single-process runs.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::traits::Store;

/// `HashMap`-backed [`Store`].
///
/// The internal `RwLock` only keeps the map itself sound under concurrent
/// calls; it is held for the duration of a single map operation and says
/// nothing about the readers-writers discipline callers observe. Data is
/// lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_map()?.len())
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_map()?.is_empty())
    }

    /// Sorted list of every stored name.
    pub fn names(&self) -> StoreResult<Vec<String>> {
        let map = self.read_map()?;
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn read_map(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, HashMap<String, String>>> {
        self.records
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_map(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.records
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Record> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let map = iter.into_iter().map(Record::into_parts).collect();
        Self {
            records: RwLock::new(map),
        }
    }
}

impl Store for InMemoryStore {
    fn find_by_name(&self, name: &str) -> StoreResult<Option<Record>> {
        let map = self.read_map()?;
        let found = map.get(name).map(|content| Record::new(name, content.clone()));
        trace!(name, found = found.is_some(), "find_by_name");
        Ok(found)
    }

    fn upsert(&self, record: &Record) -> StoreResult<()> {
        let mut map = self.write_map()?;
        let previous = map.insert(record.name().to_string(), record.content().to_string());
        trace!(name = record.name(), replaced = previous.is_some(), "upsert");
        Ok(())
    }

    fn delete_by_name(&self, name: &str) -> StoreResult<bool> {
        let mut map = self.write_map()?;
        let removed = map.remove(name).is_some();
        trace!(name, removed, "delete_by_name");
        Ok(removed)
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.read_map()?.contains_key(name))
    }
}
