use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GuardError, GuardResult};
use crate::lock::{GlobalLock, LockStrategy, ShardedLock};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub latency: LatencyConfig,
    pub lock: LockConfig,
}

impl GuardConfig {
    pub fn validate(&self) -> GuardResult<()> {
        self.latency.validate()?;
        self.lock.validate()
    }
}

/// Bounds of the simulated backend delay, `[min_ms, max_ms)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min_ms: 100,
            max_ms: 300,
        }
    }
}

impl LatencyConfig {
    pub fn validate(&self) -> GuardResult<()> {
        if self.min_ms > self.max_ms {
            return Err(GuardError::InvalidConfig(format!(
                "latency min_ms ({}) exceeds max_ms ({})",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockConfig {
    /// A single lock for the whole store.
    #[default]
    Global,
    /// `shards` locks, chosen by hashing the record name.
    Sharded { shards: usize },
}

impl LockConfig {
    pub fn validate(&self) -> GuardResult<()> {
        match self {
            Self::Sharded { shards: 0 } => Err(GuardError::InvalidConfig(
                "sharded lock needs at least one shard".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> GuardResult<Arc<dyn LockStrategy>> {
        self.validate()?;
        Ok(match self {
            Self::Global => Arc::new(GlobalLock::new()),
            Self::Sharded { shards } => Arc::new(ShardedLock::new(*shards)),
        })
    }
}
