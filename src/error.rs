//! Error types for the cache strategy engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  /// A network fetch failed outright (connection refused, timeout, DNS).
  /// Strategies catch this and substitute a fallback; network-only routing
  /// hands it to the caller unmodified.
  #[error("network fetch for {url} failed: {reason}")]
  Network { url: String, reason: String },

  /// The network answered, but with a status the operation cannot accept.
  #[error("unexpected status {status} fetching {url}")]
  UnexpectedStatus { url: String, status: u16 },

  /// Install could not populate a manifest key. The generation is left
  /// partially populated and must not be promoted.
  #[error("failed to populate '{key}' into cache generation '{version}'")]
  Population {
    version: String,
    key: String,
    #[source]
    source: Box<Error>,
  },

  #[error("HTTP client error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("cache database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("serialization error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("cache store error: {0}")]
  Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
