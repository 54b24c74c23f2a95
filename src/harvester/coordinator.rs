//! Harvest orchestration
//!
//! Runs the full pipeline in phases: walk the index pages, write the
//! catalog table, then download every uncached item through the pool.
//! Discovery finishes before the first item download starts.

use crate::cache::FsCache;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::harvester::discover::discover;
use crate::harvester::downloader::Downloader;
use crate::harvester::fetcher::FetchClient;
use crate::report::{FetchOutcome, OutcomeLog, OutcomeStatus};
use crate::table::write_catalog;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Tally of one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items in the catalog after discovery
    pub discovered: usize,

    /// Documents fetched and stored this run
    pub downloaded: usize,

    /// Items already stored by an earlier run
    pub skipped: usize,

    /// Items that exhausted their attempts
    pub failed: usize,
}

impl RunSummary {
    /// Folds download outcomes into per-status counts
    pub fn from_outcomes(discovered: usize, outcomes: &[FetchOutcome]) -> Self {
        let mut summary = RunSummary {
            discovered,
            ..RunSummary::default()
        };

        for outcome in outcomes {
            match outcome.status {
                OutcomeStatus::Success => summary.downloaded += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
                OutcomeStatus::Failed => summary.failed += 1,
            }
        }

        summary
    }
}

/// Main harvest orchestrator
pub struct Harvester {
    config: Config,
    client: Arc<FetchClient>,
    cache: Arc<FsCache>,
}

impl Harvester {
    /// Creates a harvester from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The validated run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> crate::Result<Self> {
        let client = Arc::new(FetchClient::new(&config.client)?);
        let cache = Arc::new(FsCache::new(config.output.save_dir.clone()));

        Ok(Harvester {
            config,
            client,
            cache,
        })
    }

    /// Runs discovery, writes the catalog table, and downloads everything
    ///
    /// The catalog table lands on disk before the first item download, so
    /// an interrupted run still leaves the discovery result behind.
    pub async fn run(&self) -> crate::Result<RunSummary> {
        let catalog = discover(&self.client, &self.config).await;
        info!("Found {} listings. Downloading...", catalog.len());

        write_catalog(Path::new(&self.config.output.table_path), &catalog)?;
        info!(path = %self.config.output.table_path, "Saved catalog table");

        let outcomes = self.download(&catalog).await?;
        let summary = RunSummary::from_outcomes(catalog.len(), &outcomes);

        info!(
            discovered = summary.discovered,
            downloaded = summary.downloaded,
            skipped = summary.skipped,
            failed = summary.failed,
            "Harvest finished"
        );

        Ok(summary)
    }

    async fn download(&self, catalog: &Catalog) -> crate::Result<Vec<FetchOutcome>> {
        let mut log = OutcomeLog::open(Path::new(&self.config.output.log_path))?;
        let downloader = Downloader::new(&self.config, self.client.clone(), self.cache.clone());

        downloader.run(catalog, &mut log).await
    }
}

/// Runs a whole harvest from configuration
///
/// # Example
///
/// ```no_run
/// use fewo_harvest::config::load_config;
/// use fewo_harvest::harvester::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_harvest(config).await?;
/// println!("{} downloaded, {} failed", summary.downloaded, summary.failed);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> crate::Result<RunSummary> {
    let harvester = Harvester::new(config)?;
    harvester.run().await
}
