//! Engine configuration, injected by the host at construction time.

use serde::Deserialize;

/// Configuration for a [`crate::CacheEngine`].
///
/// `cache_version` names the current cache generation and must change on
/// every deployment: a stale label makes activation a no-op and leaves old
/// cached responses being served indefinitely.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// Version label naming the current cache generation (e.g. "app-v11").
  pub cache_version: String,

  /// Request keys fetched and persisted during install, in order.
  #[serde(default)]
  pub asset_manifest: Vec<String>,

  /// Cache key of the document served when a navigation fails offline.
  /// Should itself appear in the manifest so install caches it. When unset,
  /// the navigation failure path degrades to a synthetic 503.
  #[serde(default)]
  pub offline_fallback: Option<String>,

  /// Path prefix under which requests are classified as static assets.
  #[serde(default = "default_static_prefix")]
  pub static_prefix: String,
}

fn default_static_prefix() -> String {
  "/static/".to_string()
}

impl Config {
  pub fn new(cache_version: impl Into<String>) -> Self {
    Self {
      cache_version: cache_version.into(),
      asset_manifest: Vec::new(),
      offline_fallback: None,
      static_prefix: default_static_prefix(),
    }
  }

  /// Set the asset manifest populated on install.
  pub fn with_manifest<I, S>(mut self, keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.asset_manifest = keys.into_iter().map(Into::into).collect();
    self
  }

  /// Set the offline fallback document key.
  pub fn with_offline_fallback(mut self, key: impl Into<String>) -> Self {
    self.offline_fallback = Some(key.into());
    self
  }

  /// Override the static-asset path prefix.
  pub fn with_static_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.static_prefix = prefix.into();
    self
  }
}
