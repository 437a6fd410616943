use rwfs_store::StoreError;
use thiserror::Error;

use crate::op::Operation;

#[derive(Debug, Error)]
pub enum GuardError {
    /// The simulated backend wait was interrupted; the operation was abandoned
    /// and its lock released.
    #[error("{op} on {name} interrupted")]
    Interrupted { op: Operation, name: String },

    /// The backend failed; its error is carried unchanged.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A latency or lock setting was rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GuardError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

pub type GuardResult<T> = Result<T, GuardError>;
