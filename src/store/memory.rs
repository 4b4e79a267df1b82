//! In-memory cache store backend.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{CacheStore, CachedResponse};
use crate::error::{Error, Result};
use crate::http::Response;

type Generation = HashMap<String, CachedResponse>;

/// Store backed by a process-local map. Nothing survives a restart; useful
/// for hosts that rebuild their cache on startup and for tests.
#[derive(Default)]
pub struct MemoryStore {
  generations: RwLock<HashMap<String, Generation>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStore for MemoryStore {
  fn open(&self, name: &str) -> Result<()> {
    let mut generations = self
      .generations
      .write()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    generations.entry(name.to_string()).or_default();
    Ok(())
  }

  fn match_key(&self, name: &str, key: &str) -> Result<Option<CachedResponse>> {
    let generations = self
      .generations
      .read()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    Ok(
      generations
        .get(name)
        .and_then(|entries| entries.get(key))
        .cloned(),
    )
  }

  fn put(&self, name: &str, key: &str, response: &Response) -> Result<()> {
    let mut generations = self
      .generations
      .write()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    let entries = generations.entry(name.to_string()).or_default();
    entries.insert(
      key.to_string(),
      CachedResponse {
        response: response.clone(),
        cached_at: Utc::now(),
      },
    );
    Ok(())
  }

  fn delete(&self, name: &str) -> Result<bool> {
    let mut generations = self
      .generations
      .write()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    Ok(generations.remove(name).is_some())
  }

  fn list_names(&self) -> Result<Vec<String>> {
    let generations = self
      .generations
      .read()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    Ok(generations.keys().cloned().collect())
  }
}
