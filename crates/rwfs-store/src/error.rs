/// Errors reported by a [`Store`](crate::Store) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A lock guarding the backend's state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
