//! SQLite-backed cache store.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{CacheStore, CachedResponse};
use crate::error::{Error, Result};
use crate::http::Response;

/// Persistent store keeping every generation in one SQLite database.
/// Snapshots survive restarts, so an installed generation keeps serving
/// after the host process is relaunched.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (creating if needed) the database at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open (creating if needed) a database at an explicit path.
  pub fn open_at(path: &Path) -> Result<Self> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Default database path under the user data directory.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| Error::Store("could not determine data directory".to_string()))?;

    Ok(data_dir.join("cachegate").join("cache.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;

    conn.execute_batch(CACHE_SCHEMA)?;

    Ok(())
  }
}

/// Schema for generation and snapshot tables.
const CACHE_SCHEMA: &str = r#"
-- Cache generations, one row per version label
CREATE TABLE IF NOT EXISTS generations (
    name TEXT PRIMARY KEY,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Response snapshots (serialized JSON), keyed by generation + request key
CREATE TABLE IF NOT EXISTS response_cache (
    generation TEXT NOT NULL,
    request_key TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (generation, request_key)
);

CREATE INDEX IF NOT EXISTS idx_response_cache_generation
    ON response_cache(generation);
"#;

impl CacheStore for SqliteStore {
  fn open(&self, name: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;

    conn.execute(
      "INSERT OR IGNORE INTO generations (name) VALUES (?)",
      params![name],
    )?;

    Ok(())
  }

  fn match_key(&self, name: &str, key: &str) -> Result<Option<CachedResponse>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;

    let mut stmt = conn.prepare(
      "SELECT data, cached_at FROM response_cache
       WHERE generation = ? AND request_key = ?",
    )?;

    let row: Option<(Vec<u8>, String)> = stmt
      .query_row(params![name, key], |row| Ok((row.get(0)?, row.get(1)?)))
      .ok();

    match row {
      Some((data, cached_at_str)) => {
        let response: Response = serde_json::from_slice(&data)?;
        let cached_at = parse_datetime(&cached_at_str)?;
        Ok(Some(CachedResponse {
          response,
          cached_at,
        }))
      }
      None => Ok(None),
    }
  }

  fn put(&self, name: &str, key: &str, response: &Response) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
    let data = serde_json::to_vec(response)?;

    conn.execute(
      "INSERT OR IGNORE INTO generations (name) VALUES (?)",
      params![name],
    )?;
    conn.execute(
      "INSERT OR REPLACE INTO response_cache (generation, request_key, data, cached_at)
       VALUES (?, ?, ?, datetime('now'))",
      params![name, key, data],
    )?;

    Ok(())
  }

  fn delete(&self, name: &str) -> Result<bool> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;

    conn.execute("BEGIN TRANSACTION", [])?;
    conn.execute(
      "DELETE FROM response_cache WHERE generation = ?",
      params![name],
    )?;
    let removed = conn.execute("DELETE FROM generations WHERE name = ?", params![name])?;
    conn.execute("COMMIT", [])?;

    Ok(removed > 0)
  }

  fn list_names(&self) -> Result<Vec<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;

    let mut stmt = conn.prepare("SELECT name FROM generations ORDER BY name")?;
    let names = stmt
      .query_map([], |row| row.get(0))?
      .filter_map(|r| r.ok())
      .collect();

    Ok(names)
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::Store(format!("failed to parse datetime '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn open_temp() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::open_at(&dir.path().join("cache.db")).unwrap();
    (dir, store)
  }

  #[test]
  fn test_open_registers_generation() {
    let (_dir, store) = open_temp();
    store.open("app-v1").unwrap();
    store.open("app-v1").unwrap(); // idempotent

    assert_eq!(store.list_names().unwrap(), vec!["app-v1".to_string()]);
  }

  #[test]
  fn test_put_match_roundtrip() {
    let (_dir, store) = open_temp();
    let response = Response::new(200, b"<html>offline</html>".to_vec())
      .with_header("Content-Type", "text/html");

    store
      .put("app-v1", "/static/offline.html", &response)
      .unwrap();

    let cached = store
      .match_key("app-v1", "/static/offline.html")
      .unwrap()
      .unwrap();
    assert_eq!(cached.response, response);
    assert!(store.match_key("app-v1", "/static/other.css").unwrap().is_none());
  }

  #[test]
  fn test_put_overwrites_previous_snapshot() {
    let (_dir, store) = open_temp();
    store
      .put("app-v1", "/a", &Response::new(200, b"old".to_vec()))
      .unwrap();
    store
      .put("app-v1", "/a", &Response::new(200, b"new".to_vec()))
      .unwrap();

    let cached = store.match_key("app-v1", "/a").unwrap().unwrap();
    assert_eq!(cached.response.body, b"new".to_vec());
  }

  #[test]
  fn test_delete_drops_generation_and_entries() {
    let (_dir, store) = open_temp();
    store
      .put("app-v1", "/a", &Response::new(200, Vec::new()))
      .unwrap();
    store
      .put("app-v2", "/a", &Response::new(200, Vec::new()))
      .unwrap();

    assert!(store.delete("app-v1").unwrap());
    assert!(!store.delete("app-v1").unwrap());

    assert_eq!(store.list_names().unwrap(), vec!["app-v2".to_string()]);
    assert!(store.match_key("app-v1", "/a").unwrap().is_none());
    assert!(store.match_key("app-v2", "/a").unwrap().is_some());
  }

  #[test]
  fn test_snapshots_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.db");

    {
      let store = SqliteStore::open_at(&path).unwrap();
      store
        .put("app-v1", "/static/app.css", &Response::new(200, b"css".to_vec()))
        .unwrap();
    }

    let store = SqliteStore::open_at(&path).unwrap();
    let cached = store.match_key("app-v1", "/static/app.css").unwrap().unwrap();
    assert_eq!(cached.response.body, b"css".to_vec());
  }
}
