//! Readers-writers access layer for the file server.
//!
//! [`GuardedStore`] wraps a [`Store`](rwfs_store::Store) so that any number
//! of `get` calls run concurrently while `save`, `set_content` and `delete`
//! run alone. Each operation also pays a simulated backend delay *inside*
//! its critical section, which makes lock contention visible.
//!
//! # Collaborators
//!
//! Everything the guard depends on is passed in at construction:
//!
//! - the backend, any [`Store`](rwfs_store::Store)
//! - a [`LockStrategy`]: [`GlobalLock`] (default) or [`ShardedLock`]
//! - a [`Latency`] model: [`SimulatedLatency`] with its [`InterruptHandle`]
//!
//! # Guarantees
//!
//! 1. Readers never block readers.
//! 2. A writer excludes every reader and writer sharing its lock.
//! 3. Locks are released on every exit path, including errors.
//! 4. Misses are not errors: `get` yields `None`, `delete` and
//!    `set_content` yield `false` and change nothing.
//! 5. No fairness between waiting writers is promised.

pub mod config;
pub mod error;
pub mod guarded;
pub mod latency;
pub mod lock;
pub mod op;

pub use config::{GuardConfig, LatencyConfig, LockConfig};
pub use error::{GuardError, GuardResult};
pub use guarded::GuardedStore;
pub use latency::{InterruptHandle, Interrupted, Latency, SimulatedLatency};
pub use lock::{GlobalLock, LockStrategy, ShardedLock};
pub use op::{Access, Operation};
