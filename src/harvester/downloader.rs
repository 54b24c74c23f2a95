//! Concurrent download pool
//!
//! Every catalog item ends in exactly one outcome here. Already-cached
//! items are settled during the submission sweep without touching the
//! network or a worker slot. The rest are fetched by tasks gated through
//! a semaphore sized to the configured worker count, each running its
//! own attempt loop; a failed item never disturbs its neighbors.
//!
//! Outcomes are appended to the outcome log the moment they are
//! observed, and progress is reported at a fixed completion cadence.

use crate::cache::DocumentCache;
use crate::catalog::Catalog;
use crate::config::{ClientConfig, Config, DownloadConfig};
use crate::harvester::courtesy_delay;
use crate::harvester::fetcher::FetchClient;
use crate::report::{FetchOutcome, OutcomeLog, OutcomeStatus, ProgressReporter};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Worker pool that downloads every uncached catalog item
pub struct Downloader {
    client: Arc<FetchClient>,
    cache: Arc<dyn DocumentCache>,
    client_config: ClientConfig,
    download: DownloadConfig,
}

impl Downloader {
    /// Creates a downloader over the shared client and cache
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `client` - The shared fetch client
    /// * `cache` - The document cache the pool writes through
    pub fn new(config: &Config, client: Arc<FetchClient>, cache: Arc<dyn DocumentCache>) -> Self {
        Downloader {
            client,
            cache,
            client_config: config.client.clone(),
            download: config.download.clone(),
        }
    }

    /// Downloads every item in the catalog that is not already cached
    ///
    /// Cached ids settle as `Skipped` before any task spawns. Uncached
    /// ids run through the bounded pool; each worker retries on its own
    /// and reports a terminal outcome, so the pool always drains.
    ///
    /// # Arguments
    ///
    /// * `catalog` - The items to download
    /// * `log` - The outcome log; one line is appended per item
    ///
    /// # Returns
    ///
    /// All outcomes in the order they completed. The only error here is
    /// a log write failure; item failures are data, not errors.
    pub async fn run(
        &self,
        catalog: &Catalog,
        log: &mut OutcomeLog,
    ) -> crate::Result<Vec<FetchOutcome>> {
        let total = catalog.len() as u64;
        let started = Instant::now();
        let reporter = ProgressReporter::new(
            self.download.eta_interval,
            self.download.projection_total,
        );

        let semaphore = Arc::new(Semaphore::new(self.download.worker_count));
        let mut tasks: JoinSet<FetchOutcome> = JoinSet::new();

        let mut outcomes = Vec::with_capacity(catalog.len());
        let mut completed = 0u64;

        for record in catalog.records() {
            if self.cache.exists(&record.id) {
                debug!(id = %record.id, "Already saved, skipping");

                let outcome = FetchOutcome::skipped(record.id.clone());
                log.append(&outcome)?;
                outcomes.push(outcome);

                completed += 1;
                if reporter.should_report(completed, total) {
                    reporter.report(completed, total, started.elapsed());
                }
                continue;
            }

            let client = Arc::clone(&self.client);
            let cache = Arc::clone(&self.cache);
            let client_config = self.client_config.clone();
            let semaphore = Arc::clone(&semaphore);
            let retry_attempts = self.download.retry_attempts;
            let id = record.id.clone();
            let url = record.url.clone();

            tasks.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return FetchOutcome::failed(id, "download pool closed"),
                };

                download_item(client, cache, client_config, retry_attempts, id, url).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "Download task aborted");
                    continue;
                }
            };

            match outcome.status {
                OutcomeStatus::Failed => warn!(
                    id = %outcome.id,
                    error = outcome.error.as_deref().unwrap_or("unknown error"),
                    "Item download failed"
                ),
                _ => debug!(id = %outcome.id, "Item settled"),
            }

            log.append(&outcome)?;
            outcomes.push(outcome);

            completed += 1;
            if reporter.should_report(completed, total) {
                reporter.report(completed, total, started.elapsed());
            }
        }

        Ok(outcomes)
    }
}

/// Fetches one item and stores its document, retrying on any fetch error
///
/// Attempts are separated by an exponential backoff with jitter. The
/// returned outcome is always terminal; errors never escape the worker.
async fn download_item(
    client: Arc<FetchClient>,
    cache: Arc<dyn DocumentCache>,
    client_config: ClientConfig,
    retry_attempts: u32,
    id: String,
    url: String,
) -> FetchOutcome {
    let mut last_error = String::new();

    for attempt in 0..retry_attempts {
        match client.get(&url).await {
            Ok(response) => {
                return match cache.store(&id, &response.body) {
                    Ok(path) => {
                        debug!(id = %id, path = %path.display(), "Saved document");
                        courtesy_delay(&client_config).await;
                        FetchOutcome::success(id)
                    }
                    Err(e) => FetchOutcome::failed(id, e.to_string()),
                };
            }
            Err(e) => {
                warn!(id = %id, attempt = attempt + 1, error = %e, "Retrying item download");
                last_error = e.to_string();

                if attempt + 1 < retry_attempts {
                    tokio::time::sleep(backoff_with_jitter(attempt)).await;
                }
            }
        }
    }

    FetchOutcome::failed(id, format!("Failed after retries: {}", last_error))
}

/// Backoff before the next attempt: `2^attempt` seconds plus up to one
/// second of jitter, so parallel workers spread their retries out
fn backoff_with_jitter(attempt: u32) -> Duration {
    let jitter: f64 = rand::rng().random_range(0.0..1.0);
    Duration::from_secs_f64(2u64.pow(attempt.min(16)) as f64 + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FsCache;
    use crate::config::{OutputConfig, SiteConfig};
    use tempfile::tempdir;

    fn create_test_config() -> Config {
        Config {
            site: SiteConfig {
                base_url: "https://example.com/expose/".to_string(),
                listing_url: "https://example.com/catalog?page={page}".to_string(),
                page_count: 1,
            },
            client: ClientConfig {
                courtesy_delay_min_ms: 0,
                courtesy_delay_max_ms: 0,
                ..ClientConfig::default()
            },
            download: DownloadConfig::default(),
            output: OutputConfig {
                save_dir: "./htmls".to_string(),
                log_path: "./log.txt".to_string(),
                table_path: "./results.csv".to_string(),
            },
        }
    }

    #[test]
    fn test_backoff_grows_exponentially() {
        for attempt in 0..4 {
            let backoff = backoff_with_jitter(attempt);
            let base = 2u64.pow(attempt) as f64;

            assert!(backoff.as_secs_f64() >= base);
            assert!(backoff.as_secs_f64() < base + 1.0);
        }
    }

    #[tokio::test]
    async fn test_empty_catalog_produces_no_outcomes() {
        let dir = tempdir().unwrap();
        let config = create_test_config();
        let client = Arc::new(FetchClient::new(&config.client).unwrap());
        let cache = Arc::new(FsCache::new(dir.path().join("htmls")));
        let mut log = OutcomeLog::open(&dir.path().join("log.txt")).unwrap();

        let downloader = Downloader::new(&config, client, cache);
        let outcomes = downloader.run(&Catalog::new(), &mut log).await.unwrap();

        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_fully_cached_catalog_skips_without_network() {
        let dir = tempdir().unwrap();
        let config = create_test_config();
        let client = Arc::new(FetchClient::new(&config.client).unwrap());

        let cache = Arc::new(FsCache::new(dir.path().join("htmls")));
        cache.store("1", "saved earlier").unwrap();
        cache.store("2", "saved earlier").unwrap();

        let mut catalog = Catalog::new();
        catalog.record("1", "https://example.com/expose/1".to_string(), None);
        catalog.record("2", "https://example.com/expose/2".to_string(), None);

        let log_path = dir.path().join("log.txt");
        let mut log = OutcomeLog::open(&log_path).unwrap();

        // No server is running; cached ids must settle without a request
        let downloader = Downloader::new(&config, client, cache);
        let outcomes = downloader.run(&catalog, &mut log).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| o.status == OutcomeStatus::Skipped));

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(
            content,
            "SUCCESS: 1 already saved\nSUCCESS: 2 already saved\n"
        );
    }

    // Pool concurrency, retry exhaustion, and failure isolation are
    // exercised against a mock server in the integration tests.
}
