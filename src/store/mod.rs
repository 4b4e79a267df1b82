//! Cache store backends, keyed by generation name.
//!
//! A store holds named cache generations, each mapping request keys to
//! response snapshots:
//! - Writes are atomic per key; duplicate writes overwrite (last-write-wins)
//! - Matching is exact on the request key
//! - Deleting a generation drops all of its entries

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CacheStore, CachedResponse};
