use serde::Deserialize;

/// Main configuration structure for Fewo-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    pub output: OutputConfig,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL that item ids are appended to, e.g. "https://example.com/expose/"
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Listing index URL template; must contain a `{page}` placeholder
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Number of index pages to walk, starting at page 1
    #[serde(rename = "page-count")]
    pub page_count: u32,
}

/// HTTP client behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Additional attempts when the response status is transient
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Base of the exponential backoff between transient retries (seconds)
    #[serde(rename = "backoff-base-secs", default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    /// Status codes retried inside the client before the caller sees them
    #[serde(rename = "transient-statuses", default = "default_transient_statuses")]
    pub transient_statuses: Vec<u16>,

    /// Lower bound of the courtesy delay after a request (milliseconds)
    #[serde(rename = "courtesy-delay-min-ms", default = "default_delay_min_ms")]
    pub courtesy_delay_min_ms: u64,

    /// Upper bound of the courtesy delay after a request (milliseconds)
    #[serde(rename = "courtesy-delay-max-ms", default = "default_delay_max_ms")]
    pub courtesy_delay_max_ms: u64,
}

/// Download pool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Number of item downloads allowed in flight at once
    #[serde(rename = "worker-count", default = "default_worker_count")]
    pub worker_count: usize,

    /// Attempts per item before it is recorded as failed
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Completions between progress reports
    #[serde(rename = "eta-interval", default = "default_eta_interval")]
    pub eta_interval: u64,

    /// Hypothetical item count used for the projected-run estimate
    #[serde(rename = "projection-total", default = "default_projection_total")]
    pub projection_total: u64,
}

/// Output path configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the downloaded documents are saved into, one file per id
    #[serde(rename = "save-dir")]
    pub save_dir: String,

    /// Path of the append-only outcome log
    #[serde(rename = "log-path")]
    pub log_path: String,

    /// Path of the CSV catalog table
    #[serde(rename = "table-path")]
    pub table_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_secs: default_timeout_secs(),
            retry_limit: default_retry_limit(),
            backoff_base_secs: default_backoff_base_secs(),
            transient_statuses: default_transient_statuses(),
            courtesy_delay_min_ms: default_delay_min_ms(),
            courtesy_delay_max_ms: default_delay_max_ms(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        DownloadConfig {
            worker_count: default_worker_count(),
            retry_attempts: default_retry_attempts(),
            eta_interval: default_eta_interval(),
            projection_total: default_projection_total(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_retry_limit() -> u32 {
    5
}

fn default_backoff_base_secs() -> u64 {
    1
}

fn default_transient_statuses() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

fn default_delay_min_ms() -> u64 {
    300
}

fn default_delay_max_ms() -> u64 {
    600
}

fn default_worker_count() -> usize {
    8
}

fn default_retry_attempts() -> u32 {
    5
}

fn default_eta_interval() -> u64 {
    1000
}

fn default_projection_total() -> u64 {
    150_000
}
