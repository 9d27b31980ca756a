//! Shared HTTP client and the fetch seam used by scrapers and the cache.
//!
//! All network I/O goes through the [`Fetch`] trait so the per-source
//! failure isolation and the cache's fetch-once guarantee can be exercised
//! in tests without a network. The real implementation, [`HttpFetcher`],
//! uses one lazily built [`reqwest::Client`] carrying fixed request headers
//! and a fixed timeout to reduce the chance of being blocked.
//!
//! There is deliberately no retry logic here: a request either completes,
//! times out, or surfaces a transport error to the caller.

use once_cell::sync::Lazy;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

const USER_AGENT_VALUE: &str = "Mozilla/5.0 (compatible; ComicsRSS/1.0)";
const ACCEPT_VALUE: &str = "text/html,application/xhtml+xml,image/*;q=0.9,*/*;q=0.8";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("static client configuration")
});

/// Trait for blocking-style sequential HTTP fetches.
///
/// Implementors download a resource and return its body. Non-2xx statuses
/// must surface as errors, never as bodies.
pub trait Fetch {
    /// Fetch a URL and return its body as text.
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>>;

    /// Fetch a URL and return its raw bytes.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn Error>>;
}

/// [`Fetch`] implementation backed by the shared [`reqwest::Client`].
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = CLIENT.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(body)
    }

    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
        let response = CLIENT.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(bytes = body.len(), "Fetched resource");
        Ok(body.to_vec())
    }
}
