use serde::{Deserialize, Serialize};

use crate::error::{WorkloadError, WorkloadResult};

/// Shape of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Number of records seeded before users start (`file_0` ..).
    pub records: usize,
    /// Number of simulated users, one operation each.
    pub users: usize,
    /// Content every seeded record starts with.
    pub seed_content: String,
    /// Chance that a user writes rather than reads.
    pub write_probability: f64,
    /// Fixes the sequence of user choices when set.
    pub rng_seed: Option<u64>,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            records: 10,
            users: 100,
            seed_content: "Random: ".into(),
            write_probability: 0.5,
            rng_seed: None,
        }
    }
}

impl WorkloadConfig {
    pub fn validate(&self) -> WorkloadResult<()> {
        if !(0.0..=1.0).contains(&self.write_probability) {
            return Err(WorkloadError::InvalidConfig(format!(
                "write_probability must be within [0, 1], got {}",
                self.write_probability
            )));
        }
        if self.users > 0 && self.records == 0 {
            return Err(WorkloadError::InvalidConfig(
                "simulated users need at least one seeded record".into(),
            ));
        }
        // TOML integers are signed 64-bit.
        if let Some(seed) = self.rng_seed.filter(|&s| s > i64::MAX as u64) {
            return Err(WorkloadError::InvalidConfig(format!(
                "rng_seed must be at most {}, got {seed}",
                i64::MAX
            )));
        }
        Ok(())
    }
}
