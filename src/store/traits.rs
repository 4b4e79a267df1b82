//! Core trait and types for cache store backends.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::http::Response;

/// A stored response snapshot plus cache metadata.
#[derive(Debug, Clone)]
pub struct CachedResponse {
  /// The snapshot as it was persisted.
  pub response: Response,
  /// When the snapshot was written.
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache store backends.
///
/// Generations are independent namespaces identified by a version label.
/// Implementations must make `put` atomic per key so concurrent writers
/// resolve to one complete snapshot (last write wins).
pub trait CacheStore: Send + Sync {
  /// Create the named generation if it does not already exist.
  fn open(&self, name: &str) -> Result<()>;

  /// Look up the snapshot stored under `key` in generation `name`.
  fn match_key(&self, name: &str, key: &str) -> Result<Option<CachedResponse>>;

  /// Write a snapshot under `key`, creating the generation if absent.
  /// Overwrites any previous snapshot for the same key.
  fn put(&self, name: &str, key: &str, response: &Response) -> Result<()>;

  /// Delete an entire generation and its entries. Returns whether the
  /// generation existed.
  fn delete(&self, name: &str) -> Result<bool>;

  /// Names of all live generations.
  fn list_names(&self) -> Result<Vec<String>>;
}
