//! HTTP fetch client
//!
//! This module owns all network traffic for the harvester:
//! - One pooled client per run, so connections are reused across requests
//! - Fixed User-Agent and Accept-Language headers on every request
//! - Retry with exponential backoff for transient status codes
//!
//! Failures that survive the client-level retries are returned to the
//! caller; the download pool has its own per-item attempt loop on top.

use crate::config::ClientConfig;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Errors a fetch can end with once client-level retries are spent
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request never produced a usable response
    #[error("Request failed for {url}: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },
}

/// A successful response with its body decoded to text
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP client with a fixed identity and transient-status retry
///
/// Statuses in the configured transient set (429 and the common 5xx
/// gateway codes by default) are absorbed here: the client backs off and
/// retries up to its retry limit before reporting the status to the
/// caller. Everything else surfaces on the first occurrence.
pub struct FetchClient {
    client: Client,
    retry_limit: u32,
    backoff_base_secs: u64,
    transient_statuses: Vec<u16>,
}

impl FetchClient {
    /// Builds the client from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration
    ///
    /// # Returns
    ///
    /// * `Ok(FetchClient)` - Successfully built client
    /// * `Err(HarvestError)` - Header values were invalid or the client
    ///   could not be constructed
    pub fn new(config: &ClientConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
            ConfigError::Validation(format!(
                "accept-language is not a valid header value: {}",
                e
            ))
        })?;
        headers.insert(ACCEPT_LANGUAGE, accept_language);

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(FetchClient {
            client,
            retry_limit: config.retry_limit,
            backoff_base_secs: config.backoff_base_secs,
            transient_statuses: config.transient_statuses.clone(),
        })
    }

    /// Fetches a URL and returns its body text
    ///
    /// Transient statuses are retried with `backoff-base-secs * 2^n`
    /// sleeps between attempts. A transient status that outlives the
    /// retry limit is returned as [`FetchError::Status`], the same as
    /// any other non-success status.
    pub async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut attempt = 0u32;

        loop {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            let status = response.status().as_u16();

            if self.is_transient(status) && attempt < self.retry_limit {
                let backoff =
                    Duration::from_secs(self.backoff_base_secs * 2u64.pow(attempt.min(16)));
                attempt += 1;
                warn!(
                    url,
                    status, attempt, "Transient status, retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status,
                });
            }

            let body = response
                .text()
                .await
                .map_err(|source| FetchError::Transport {
                    url: url.to_string(),
                    source,
                })?;

            return Ok(FetchResponse { status, body });
        }
    }

    fn is_transient(&self, status: u16) -> bool {
        self.transient_statuses.contains(&status)
    }
}
