//! HTTP transport for fetching daily pages.
//!
//! The fetch seam is a trait so the pipeline can run against an in-memory
//! page source in tests. The production implementation wraps a blocking
//! `reqwest` client configured with the run's timeout and user agent.
//!
//! A `404` means the day's page has not been published; that is reported as
//! `None`, not as an error. Every other failure (timeout, server error,
//! connection refused) propagates and aborts the run.

use std::error::Error;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, instrument};

use crate::config::Config;

/// Fetch a page by URL, distinguishing "not published" from hard failure.
pub trait PageFetcher {
    /// Returns `Ok(None)` when the page does not exist, `Ok(Some(html))` on
    /// success, and an error for any other transport failure.
    fn fetch(&self, url: &str) -> Result<Option<String>, Box<dyn Error>>;
}

/// [`PageFetcher`] backed by a blocking HTTP client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the client once with the configured timeout and user agent.
    pub fn new(cfg: &Config) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.as_str())
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    fn fetch(&self, url: &str) -> Result<Option<String>, Box<dyn Error>> {
        let response = self.client.get(url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%url, "Page not found");
            return Ok(None);
        }
        let body = response.error_for_status()?.text()?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(Some(body))
    }
}
