//! Request and response types seen by the engine.
//!
//! A [`Request`] carries just enough to classify it (method, URL, navigation
//! mode); a [`Response`] is the immutable snapshot the cache store persists:
//! status, headers, body. Both are deliberately independent of any HTTP
//! client crate so store backends and test fetchers stay lightweight.

use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
  Get,
  Head,
  Post,
  Put,
  Delete,
  Patch,
  Options,
}

impl std::fmt::Display for Method {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Method::Get => "GET",
      Method::Head => "HEAD",
      Method::Post => "POST",
      Method::Put => "PUT",
      Method::Delete => "DELETE",
      Method::Patch => "PATCH",
      Method::Options => "OPTIONS",
    };
    f.write_str(s)
  }
}

/// How the request was initiated. Only [`RequestMode::Navigate`] influences
/// routing; the other modes exist so hosts can pass their requests through
/// without translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestMode {
  /// A page navigation (address bar, link click, form GET).
  Navigate,
  SameOrigin,
  Cors,
  NoCors,
}

/// An intercepted outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
  pub method: Method,
  /// Absolute URL or stable absolute path; doubles as the cache key.
  pub url: String,
  pub mode: RequestMode,
}

impl Request {
  pub fn new(method: Method, url: impl Into<String>) -> Self {
    Self {
      method,
      url: url.into(),
      mode: RequestMode::NoCors,
    }
  }

  /// A plain GET for a subresource.
  pub fn get(url: impl Into<String>) -> Self {
    Self::new(Method::Get, url)
  }

  /// A GET carrying page-navigation intent.
  pub fn navigate(url: impl Into<String>) -> Self {
    Self {
      method: Method::Get,
      url: url.into(),
      mode: RequestMode::Navigate,
    }
  }

  /// Path component of the URL, used for static-prefix classification.
  /// Falls back to the raw key (query stripped) when the URL is a bare path.
  pub fn path(&self) -> String {
    match Url::parse(&self.url) {
      Ok(parsed) => parsed.path().to_string(),
      Err(_) => self
        .url
        .split(['?', '#'])
        .next()
        .unwrap_or(&self.url)
        .to_string(),
    }
  }
}

/// An immutable response snapshot: status, headers, body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
  pub status: u16,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl Response {
  pub fn new(status: u16, body: Vec<u8>) -> Self {
    Self {
      status,
      headers: Vec::new(),
      body,
    }
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  /// Whether the status is in the success range (2xx).
  pub fn ok(&self) -> bool {
    (200..300).contains(&self.status)
  }

  /// First header value with the given name, matched case-insensitively.
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(n, _)| n.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }

  /// Minimal synthetic response for a navigation that cannot be served from
  /// network, cache, or the offline fallback.
  pub fn unavailable() -> Self {
    Response::new(503, b"Service Unavailable".to_vec())
      .with_header("Content-Type", "text/plain; charset=utf-8")
  }

  /// Empty synthetic response for a static asset that is neither cached nor
  /// reachable over the network.
  pub fn timeout() -> Self {
    Response::new(408, Vec::new())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_path_from_absolute_url() {
    let request = Request::get("https://example.com/static/app.css?v=3");
    assert_eq!(request.path(), "/static/app.css");
  }

  #[test]
  fn test_path_from_bare_path() {
    let request = Request::get("/static/icons/icon-192x192.png");
    assert_eq!(request.path(), "/static/icons/icon-192x192.png");

    let with_query = Request::get("/tasks?page=2");
    assert_eq!(with_query.path(), "/tasks");
  }

  #[test]
  fn test_navigate_sets_mode_and_method() {
    let request = Request::navigate("/tasks/42/");
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.mode, RequestMode::Navigate);
  }

  #[test]
  fn test_response_ok_range() {
    assert!(Response::new(200, Vec::new()).ok());
    assert!(Response::new(204, Vec::new()).ok());
    assert!(!Response::new(304, Vec::new()).ok());
    assert!(!Response::new(404, Vec::new()).ok());
  }

  #[test]
  fn test_header_lookup_is_case_insensitive() {
    let response = Response::new(200, Vec::new()).with_header("Content-Type", "text/html");
    assert_eq!(response.header("content-type"), Some("text/html"));
    assert_eq!(response.header("x-missing"), None);
  }

  #[test]
  fn test_synthetic_responses() {
    assert_eq!(Response::unavailable().status, 503);
    let timeout = Response::timeout();
    assert_eq!(timeout.status, 408);
    assert!(timeout.body.is_empty());
  }
}
