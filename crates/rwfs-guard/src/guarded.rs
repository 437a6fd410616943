use std::sync::Arc;

use rwfs_store::{Record, Store};
use tracing::{debug, warn};

use crate::config::GuardConfig;
use crate::error::{GuardError, GuardResult};
use crate::latency::{InterruptHandle, Latency, SimulatedLatency};
use crate::lock::LockStrategy;
use crate::op::Operation;

/// A [`Store`] behind a readers-writers lock and a simulated backend delay.
///
/// Every operation takes its lock, waits out the latency model while holding
/// it, touches the store, and releases the lock when the guard drops. Cloning
/// is cheap and every clone shares the same store, locks and latency.
#[derive(Clone)]
pub struct GuardedStore {
    store: Arc<dyn Store>,
    locks: Arc<dyn LockStrategy>,
    latency: Arc<dyn Latency>,
}

impl GuardedStore {
    pub fn new(
        store: Arc<dyn Store>,
        locks: Arc<dyn LockStrategy>,
        latency: Arc<dyn Latency>,
    ) -> Self {
        Self {
            store,
            locks,
            latency,
        }
    }

    /// Build a guard with the configured lock strategy and a
    /// [`SimulatedLatency`]; the returned handle interrupts its waits.
    pub fn from_config(
        store: Arc<dyn Store>,
        config: &GuardConfig,
    ) -> GuardResult<(Self, InterruptHandle)> {
        config.validate()?;
        let locks = config.lock.build()?;
        let latency = SimulatedLatency::new(&config.latency)?;
        let handle = latency.interrupt_handle();
        Ok((Self::new(store, locks, Arc::new(latency)), handle))
    }

    pub fn locks(&self) -> &Arc<dyn LockStrategy> {
        &self.locks
    }

    /// Read a record. Any number of `get` calls may run at once.
    pub async fn get(&self, name: &str) -> GuardResult<Option<Record>> {
        let lock = self.locks.lock_for(name);
        debug!(name, "attempting get");
        let _guard = lock.read().await;
        self.backend_delay(Operation::Get, name).await?;
        let record = self.store.find_by_name(name)?;
        debug!(name, found = record.is_some(), "get complete");
        Ok(record)
    }

    /// Remove a record. Returns `false` (and changes nothing) if it was absent.
    pub async fn delete(&self, name: &str) -> GuardResult<bool> {
        let lock = self.locks.lock_for(name);
        debug!(name, "attempting delete");
        let _guard = lock.write().await;
        self.backend_delay(Operation::Delete, name).await?;
        let removed = self.store.delete_by_name(name)?;
        if removed {
            debug!(name, "record deleted");
        } else {
            debug!(name, "record not found");
        }
        Ok(removed)
    }

    /// Replace the content of an existing record.
    ///
    /// Never creates a record: returns `false` if `name` is absent.
    pub async fn set_content(&self, name: &str, content: impl Into<String>) -> GuardResult<bool> {
        let content = content.into();
        let lock = self.locks.lock_for(name);
        debug!(name, "attempting set_content");
        let _guard = lock.write().await;
        self.backend_delay(Operation::SetContent, name).await?;
        match self.store.find_by_name(name)? {
            Some(record) => {
                self.store.upsert(&record.with_content(content))?;
                debug!(name, "content replaced");
                Ok(true)
            }
            None => {
                debug!(name, "record not found");
                Ok(false)
            }
        }
    }

    /// Create or overwrite a record.
    pub async fn save(&self, record: Record) -> GuardResult<()> {
        let lock = self.locks.lock_for(record.name());
        debug!(name = record.name(), "attempting save");
        let _guard = lock.write().await;
        self.backend_delay(Operation::Save, record.name()).await?;
        self.store.upsert(&record)?;
        debug!(name = record.name(), "record saved");
        Ok(())
    }

    async fn backend_delay(&self, op: Operation, name: &str) -> GuardResult<()> {
        match self.latency.delay(op).await {
            Ok(waited) => {
                debug!(%op, name, delay_ms = waited.as_millis() as u64, "backend delay elapsed");
                Ok(())
            }
            Err(_) => {
                warn!(%op, name, "operation interrupted");
                Err(GuardError::Interrupted {
                    op,
                    name: name.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for GuardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedStore")
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}
