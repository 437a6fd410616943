//! Lock strategies: which readers-writers lock protects a given record.
//!
//! [`GuardedStore`](crate::GuardedStore) asks its strategy for the lock that
//! covers a name and takes it in read or write mode. Swapping the strategy
//! changes lock granularity without touching any call site.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use tokio::sync::RwLock;

/// Maps a record name to the lock that guards it.
///
/// Two names that map to the same lock are fully serialized against each
/// other's writes. The mapping for a given name must never change over the
/// lifetime of the strategy.
pub trait LockStrategy: Send + Sync + std::fmt::Debug {
    fn lock_for(&self, name: &str) -> Arc<RwLock<()>>;

    /// Number of distinct locks this strategy hands out.
    fn lock_count(&self) -> usize;
}

/// One lock for the whole store.
///
/// Any writer excludes every other operation on every record.
#[derive(Debug, Default)]
pub struct GlobalLock {
    lock: Arc<RwLock<()>>,
}

impl GlobalLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockStrategy for GlobalLock {
    fn lock_for(&self, _name: &str) -> Arc<RwLock<()>> {
        Arc::clone(&self.lock)
    }

    fn lock_count(&self) -> usize {
        1
    }
}

/// A fixed number of locks, each covering the names that hash to it.
#[derive(Debug)]
pub struct ShardedLock {
    shards: Vec<Arc<RwLock<()>>>,
}

impl ShardedLock {
    /// Create a strategy with `shards` locks. Zero is treated as one.
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| Arc::new(RwLock::new(())))
            .collect();
        Self { shards }
    }

    pub fn shard_index(&self, name: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }
}

impl LockStrategy for ShardedLock {
    fn lock_for(&self, name: &str) -> Arc<RwLock<()>> {
        Arc::clone(&self.shards[self.shard_index(name)])
    }

    fn lock_count(&self) -> usize {
        self.shards.len()
    }
}
