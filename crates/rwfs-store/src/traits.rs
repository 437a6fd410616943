use crate::error::StoreResult;
use crate::record::Record;

/// Persistence backend for named records.
///
/// A store is a plain keyed collection: it has no notion of readers and
/// writers and makes no promise about ordering between concurrent callers
/// beyond keeping its own state memory-safe. Callers that need the
/// readers-writers discipline go through `rwfs_guard::GuardedStore`.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait Store: Send + Sync {
    /// Look up a record by name.
    ///
    /// Returns `Ok(None)` if no record has that name. Has no side effects.
    fn find_by_name(&self, name: &str) -> StoreResult<Option<Record>>;

    /// Create the record, or replace the one with the same name.
    ///
    /// Idempotent: upserting the same record twice leaves one copy.
    fn upsert(&self, record: &Record) -> StoreResult<()>;

    /// Remove the record with this name.
    ///
    /// Returns `Ok(true)` if a record was removed, `Ok(false)` if none
    /// existed. Removing an absent name is not an error.
    fn delete_by_name(&self, name: &str) -> StoreResult<bool>;

    /// Whether a record with this name exists.
    fn contains(&self, name: &str) -> StoreResult<bool> {
        Ok(self.find_by_name(name)?.is_some())
    }
}
