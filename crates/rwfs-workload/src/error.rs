use rwfs_guard::GuardError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Users were requested before any record was seeded.
    #[error("no records seeded; cannot pick a target for simulated users")]
    NotSeeded,

    /// At least one seed save failed. All other saves were still joined.
    #[error("seeding failed for {failed} of {total} records")]
    Seed {
        failed: usize,
        total: usize,
        #[source]
        source: Box<WorkloadError>,
    },

    #[error("guarded store error: {0}")]
    Guard(#[from] GuardError),

    /// A spawned unit panicked or was aborted.
    #[error("task failed: {0}")]
    Task(#[from] JoinError),
}

pub type WorkloadResult<T> = Result<T, WorkloadError>;
