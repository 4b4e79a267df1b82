//! Client-side cache strategy engine for offline-capable application shells.
//!
//! `cachegate` sits between an application shell and the network. Its three
//! entry points mirror the host lifecycle:
//! - [`CacheEngine::install`] populates a named cache generation from a
//!   fixed asset manifest
//! - [`CacheEngine::activate`] purges every generation except the current one
//! - [`CacheEngine::route`] answers each intercepted request with one of
//!   three strategies: network-first for navigations, cache-first for static
//!   assets, network-only for everything else
//!
//! The engine is generic over a [`CacheStore`] backend (in-memory or SQLite
//! included) and a [`Fetch`] network seam (reqwest-backed [`HttpFetcher`]
//! included). Offline failures degrade gracefully: cached page, then the
//! configured offline document, then a synthetic error response.

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod host;
pub mod http;
pub mod store;

pub use config::Config;
pub use engine::CacheEngine;
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use host::{HostSignals, NoopSignals};
pub use http::{Method, Request, RequestMode, Response};
pub use store::{CacheStore, CachedResponse, MemoryStore, SqliteStore};
