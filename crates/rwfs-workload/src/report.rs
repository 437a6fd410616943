use chrono::{DateTime, Utc};
use rwfs_store::Record;
use serde::Serialize;
use uuid::Uuid;

/// What one simulated user ended up doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserOutcome {
    /// A `get`; `hit` is whether the record existed.
    Read { hit: bool },
    /// A `set_content`; `hit` is whether the record existed and was updated.
    Write { hit: bool },
}

/// Tally of the user phase. `reads + writes + failures == users`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub users: usize,
    pub reads: usize,
    pub read_hits: usize,
    pub writes: usize,
    pub write_hits: usize,
    pub failures: usize,
}

impl UserStats {
    pub fn record(&mut self, outcome: UserOutcome) {
        match outcome {
            UserOutcome::Read { hit } => {
                self.reads += 1;
                self.read_hits += usize::from(hit);
            }
            UserOutcome::Write { hit } => {
                self.writes += 1;
                self.write_hits += usize::from(hit);
            }
        }
    }

    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}

/// Records read back after a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Present records, sorted by name.
    pub records: Vec<Record>,
    /// Seeded names that were not found, sorted.
    pub missing: Vec<String>,
}

/// Summary of a full seed + users + verify run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub seeded: usize,
    pub users: UserStats,
    pub missing: Vec<String>,
    pub records: Vec<Record>,
}

impl RunReport {
    /// No failed users and every seeded record still present.
    pub fn is_clean(&self) -> bool {
        self.users.failures == 0 && self.missing.is_empty()
    }
}
