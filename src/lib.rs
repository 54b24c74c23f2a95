//! Fewo-Harvest: a polite catalog harvester
//!
//! This crate walks a paginated listing index, records every discovered item,
//! downloads each item's detail page through a bounded worker pool with
//! retries, and extracts structured fields from the saved documents.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod harvester;
pub mod report;
pub mod table;

use thiserror::Error;

/// Main error type for Fewo-Harvest operations
///
/// Worker-level fetch and store failures never surface here. They are
/// demoted to `Failed` outcomes so one bad item cannot end the run.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Table error: {0}")]
    Table(#[from] table::TableError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Fewo-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{DocumentCache, FsCache};
pub use catalog::{Catalog, ItemRecord};
pub use config::Config;
pub use report::{FetchOutcome, OutcomeStatus};
