//! User simulation for the readers-writers file server.
//!
//! A run has three ordered phases, each a fan-out of tokio tasks followed by
//! a join over all of them:
//!
//! 1. **Seed**: save `file_0` .. `file_{n-1}` with the seed content.
//! 2. **Users**: each simulated user picks a random seeded record and either
//!    writes a random integer into it or reads it.
//! 3. **Verify**: read every seeded record back and list the missing ones.
//!
//! A failed seed save aborts the run after the seed phase is joined. A
//! failed user is counted in the [`RunReport`] and does not affect others.

pub mod config;
pub mod driver;
pub mod error;
pub mod report;

pub use config::WorkloadConfig;
pub use driver::{record_names, UserAction, WorkloadDriver};
pub use error::{WorkloadError, WorkloadResult};
pub use report::{RunReport, UserOutcome, UserStats, Verification};
