//! The cache strategy engine: install, activate, and per-request routing.
//!
//! The engine sits between the application shell and the network. Install
//! populates a named cache generation from the asset manifest, activate
//! purges superseded generations, and route answers each intercepted request
//! with one of three strategies picked by request class.

use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::host::{HostSignals, NoopSignals};
use crate::http::{Method, Request, RequestMode, Response};
use crate::store::CacheStore;

/// Strategy-relevant request class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestClass {
  /// Page navigation: network-first with cached/offline fallback.
  Navigation,
  /// Path under the static prefix: cache-first with network refill.
  StaticAsset,
  /// Everything else: network only.
  Other,
}

/// First matching predicate wins: navigation, then static prefix, then the
/// default. No further checks after a match.
fn classify(request: &Request, static_prefix: &str) -> RequestClass {
  if request.mode == RequestMode::Navigate {
    return RequestClass::Navigation;
  }
  if request.path().starts_with(static_prefix) {
    return RequestClass::StaticAsset;
  }
  RequestClass::Other
}

/// Cache strategy engine, generic over the store backend and the network
/// fetcher.
///
/// All three entry points may run concurrently with routing; the host is
/// expected to run at most one install and one activate at a time. Store
/// writes are atomic per key, so concurrent writers resolve last-write-wins.
pub struct CacheEngine<S, F> {
  config: Config,
  store: Arc<S>,
  fetcher: Arc<F>,
  host: Arc<dyn HostSignals>,
}

impl<S, F> CacheEngine<S, F>
where
  S: CacheStore + 'static,
  F: Fetch,
{
  pub fn new(config: Config, store: Arc<S>, fetcher: Arc<F>) -> Self {
    Self {
      config,
      store,
      fetcher,
      host: Arc::new(NoopSignals),
    }
  }

  /// Attach a host to receive lifecycle signals.
  pub fn with_host(mut self, host: Arc<dyn HostSignals>) -> Self {
    self.host = host;
    self
  }

  /// Version label of the current cache generation.
  pub fn cache_version(&self) -> &str {
    &self.config.cache_version
  }

  /// Populate the current generation from the asset manifest.
  ///
  /// All-or-nothing: every manifest key must fetch with a success status or
  /// the install fails and the generation must not be promoted. On success
  /// the host is told to skip its transitional waiting period.
  pub async fn install(&self) -> Result<()> {
    let version = &self.config.cache_version;
    debug!(
      %version,
      assets = self.config.asset_manifest.len(),
      "installing cache generation"
    );

    self.store.open(version)?;

    let populates = self
      .config
      .asset_manifest
      .iter()
      .map(|key| self.populate(key));
    try_join_all(populates).await?;

    self.host.skip_waiting();
    Ok(())
  }

  /// Fetch one manifest key and persist the snapshot.
  async fn populate(&self, key: &str) -> Result<()> {
    let version = self.config.cache_version.clone();

    let result = async {
      let response = self.fetcher.fetch(&Request::get(key)).await?;
      if !response.ok() {
        return Err(Error::UnexpectedStatus {
          url: key.to_string(),
          status: response.status,
        });
      }
      self.store.put(&version, key, &response)
    }
    .await;

    result.map_err(|source| Error::Population {
      version,
      key: key.to_string(),
      source: Box::new(source),
    })
  }

  /// Delete every cache generation except the current one, then tell the
  /// host to claim in-flight clients.
  ///
  /// Idempotent. Each deletion is independent and best-effort: one stuck
  /// generation must not keep the others alive.
  pub async fn activate(&self) -> Result<()> {
    let current = &self.config.cache_version;

    for name in self.store.list_names()? {
      if name == *current {
        continue;
      }
      match self.store.delete(&name) {
        Ok(_) => debug!(generation = %name, "purged stale cache generation"),
        Err(err) => {
          warn!(generation = %name, error = %err, "failed to purge stale cache generation");
        }
      }
    }

    self.host.claim_clients();
    Ok(())
  }

  /// Answer an intercepted request.
  ///
  /// Only GETs are routed through a strategy; other methods go straight to
  /// the network with failures propagating unmodified.
  pub async fn route(&self, request: &Request) -> Result<Response> {
    if request.method != Method::Get {
      return self.fetcher.fetch(request).await;
    }

    match classify(request, &self.config.static_prefix) {
      RequestClass::Navigation => self.network_first(request).await,
      RequestClass::StaticAsset => self.cache_first(request).await,
      RequestClass::Other => self.fetcher.fetch(request).await,
    }
  }

  /// Network-first strategy for navigations.
  ///
  /// 1. Fetch; a 200 is persisted in the background and returned live
  ///    (non-200 responses are returned as-is, never cached)
  /// 2. On network failure, serve the cached page if present
  /// 3. Otherwise serve the configured offline document
  /// 4. Otherwise synthesize a minimal 503
  async fn network_first(&self, request: &Request) -> Result<Response> {
    match self.fetcher.fetch(request).await {
      Ok(response) => {
        if response.status == 200 {
          self.persist_background(&request.url, response.clone());
        }
        Ok(response)
      }
      Err(err) => {
        debug!(url = %request.url, error = %err, "navigation fetch failed, serving from cache");

        let version = &self.config.cache_version;
        if let Some(cached) = self.store.match_key(version, &request.url)? {
          return Ok(cached.response);
        }
        if let Some(fallback) = &self.config.offline_fallback {
          if let Some(cached) = self.store.match_key(version, fallback)? {
            return Ok(cached.response);
          }
        }
        Ok(Response::unavailable())
      }
    }
  }

  /// Cache-first strategy for static assets.
  ///
  /// A cached snapshot short-circuits without touching the network. On a
  /// miss the asset is fetched and a 200 persisted in the background; an
  /// unreachable network with nothing cached yields an empty 408.
  async fn cache_first(&self, request: &Request) -> Result<Response> {
    let version = &self.config.cache_version;
    if let Some(cached) = self.store.match_key(version, &request.url)? {
      return Ok(cached.response);
    }

    match self.fetcher.fetch(request).await {
      Ok(response) => {
        if response.status == 200 {
          self.persist_background(&request.url, response.clone());
        }
        Ok(response)
      }
      Err(err) => {
        debug!(url = %request.url, error = %err, "asset fetch failed with no cached copy");
        Ok(Response::timeout())
      }
    }
  }

  /// Write-through populate that never blocks the response path.
  ///
  /// The task is detached: its failure is logged and swallowed, it is never
  /// awaited by the caller, and an aborted request does not cancel it.
  /// Callers must not assume the write is durable when the response returns.
  fn persist_background(&self, key: &str, response: Response) {
    let store = Arc::clone(&self.store);
    let version = self.config.cache_version.clone();
    let key = key.to_string();

    tokio::spawn(async move {
      if let Err(err) = store.put(&version, &key, &response) {
        warn!(%key, error = %err, "background cache write failed");
      }
    });
  }
}
