//! Network seam: the `Fetch` trait and its reqwest-backed implementation.

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::http::{Method, Request, Response};

/// A single-attempt network fetch.
///
/// The engine performs exactly one fetch per strategy invocation and never
/// retries; timeout behavior belongs to the implementation.
#[async_trait]
pub trait Fetch: Send + Sync {
  async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// `Fetch` implementation over a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self> {
    let client = reqwest::Client::builder().build()?;
    Ok(Self { client })
  }

  /// Wrap an existing client (custom timeouts, proxies, user agent).
  pub fn with_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

impl From<Method> for reqwest::Method {
  fn from(method: Method) -> Self {
    match method {
      Method::Get => reqwest::Method::GET,
      Method::Head => reqwest::Method::HEAD,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Delete => reqwest::Method::DELETE,
      Method::Patch => reqwest::Method::PATCH,
      Method::Options => reqwest::Method::OPTIONS,
    }
  }
}

#[async_trait]
impl Fetch for HttpFetcher {
  async fn fetch(&self, request: &Request) -> Result<Response> {
    let response = self
      .client
      .request(request.method.into(), &request.url)
      .send()
      .await
      .map_err(|e| Error::Network {
        url: request.url.clone(),
        reason: e.to_string(),
      })?;

    let status = response.status().as_u16();
    let headers = response
      .headers()
      .iter()
      .filter_map(|(name, value)| {
        value
          .to_str()
          .ok()
          .map(|v| (name.as_str().to_string(), v.to_string()))
      })
      .collect();
    let body = response
      .bytes()
      .await
      .map_err(|e| Error::Network {
        url: request.url.clone(),
        reason: e.to_string(),
      })?
      .to_vec();

    Ok(Response {
      status,
      headers,
      body,
    })
  }
}
