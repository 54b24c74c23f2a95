//! Harvester module for catalog walking and item downloading
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with transient-status retry
//! - Listing page parsing and sequential index discovery
//! - The bounded concurrent download pool
//! - Overall run coordination
//!
//! Requests made here observe a courtesy delay drawn from the configured
//! range, both between index pages and after each stored item.

mod coordinator;
mod discover;
mod downloader;
mod fetcher;
mod listing;

pub use coordinator::{run_harvest, Harvester, RunSummary};
pub use discover::discover;
pub use downloader::Downloader;
pub use fetcher::{FetchClient, FetchError, FetchResponse};
pub use listing::{parse_listing_page, ListingEntry};

use crate::config::ClientConfig;
use rand::Rng;
use std::time::Duration;

/// Sleeps for a random duration drawn from the configured courtesy range
pub(crate) async fn courtesy_delay(config: &ClientConfig) {
    // The thread-local rng cannot be held across an await
    let delay_ms = {
        let mut rng = rand::rng();
        rng.random_range(config.courtesy_delay_min_ms..=config.courtesy_delay_max_ms)
    };

    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
