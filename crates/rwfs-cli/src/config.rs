use std::path::Path;

use anyhow::Context;
use rwfs_guard::{GuardConfig, LockConfig};
use rwfs_workload::WorkloadConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Overrides;

/// Everything a run needs, as read from the optional TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub guard: GuardConfig,
    pub workload: WorkloadConfig,
}

impl AppConfig {
    /// Read `path`, or fall back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn apply(&mut self, o: &Overrides) {
        if let Some(users) = o.users {
            self.workload.users = users;
        }
        if let Some(records) = o.records {
            self.workload.records = records;
        }
        if let Some(p) = o.write_probability {
            self.workload.write_probability = p;
        }
        if o.rng_seed.is_some() {
            self.workload.rng_seed = o.rng_seed;
        }
        if let Some(shards) = o.shards {
            self.guard.lock = LockConfig::Sharded { shards };
        }
        if let Some(min) = o.min_latency_ms {
            self.guard.latency.min_ms = min;
        }
        if let Some(max) = o.max_latency_ms {
            self.guard.latency.max_ms = max;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.guard.validate().context("invalid [guard] configuration")?;
        self.workload.validate().context("invalid [workload] configuration")?;
        Ok(())
    }
}
