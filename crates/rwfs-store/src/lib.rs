//! Record model and persistence backends for the readers-writers file server.
//!
//! A [`Record`] is a name/content pair keyed by its name. Backends implement
//! the [`Store`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store used by the simulator and tests
//!
//! A store on its own provides no readers-writers discipline. All access in
//! the running system goes through `rwfs-guard`, which wraps a store with the
//! lock and the simulated backend latency.

pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use record::Record;
pub use traits::Store;
