//! Fetch Module
//!
//! The keyed computation a memoizer wraps, and its HTTP implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};

// == Fetch Trait ==
/// An expensive, keyed computation whose result may be memoized.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Result type, cloned out of the memo on every hit.
    type Output: Clone + Send + Sync + 'static;

    /// Computes the value for `key`.
    async fn fetch(&self, key: &str) -> Result<Self::Output>;
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    type Output = T::Output;

    async fn fetch(&self, key: &str) -> Result<Self::Output> {
        (**self).fetch(key).await
    }
}

// == HTTP Fetcher ==
/// Retrieves the body text of a URL.
///
/// The body is returned whatever the response status; only transport
/// failures are errors.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Fetch(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    type Output = String;

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CacheError::Fetch(format!("GET {} failed: {}", url, e)))?;

        debug!("GET {} -> {}", url, response.status());

        response
            .text()
            .await
            .map_err(|e| CacheError::Fetch(format!("reading body of {} failed: {}", url, e)))
    }
}
