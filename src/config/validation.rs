use crate::config::types::{ClientConfig, Config, DownloadConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_client_config(&config.client)?;
    validate_download_config(&config.download)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    // Item URLs are formed by appending the id, so the base has to end in a slash
    if !config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base-url must end with '/', got '{}'",
            config.base_url
        )));
    }

    if !config.listing_url.contains("{page}") {
        return Err(ConfigError::Validation(format!(
            "listing-url must contain a '{{page}}' placeholder, got '{}'",
            config.listing_url
        )));
    }

    // Validate the URL the template produces, not the raw template
    Url::parse(&config.listing_url.replace("{page}", "1"))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing-url: {}", e)))?;

    if config.page_count < 1 {
        return Err(ConfigError::Validation(format!(
            "page-count must be >= 1, got {}",
            config.page_count
        )));
    }

    Ok(())
}

/// Validates client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    for status in &config.transient_statuses {
        if *status < 100 || *status > 599 {
            return Err(ConfigError::Validation(format!(
                "transient-statuses entries must be valid HTTP status codes, got {}",
                status
            )));
        }
    }

    if config.courtesy_delay_min_ms > config.courtesy_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "courtesy-delay-min-ms ({}) cannot exceed courtesy-delay-max-ms ({})",
            config.courtesy_delay_min_ms, config.courtesy_delay_max_ms
        )));
    }

    Ok(())
}

/// Validates download pool configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.worker_count < 1 || config.worker_count > 100 {
        return Err(ConfigError::Validation(format!(
            "worker-count must be between 1 and 100, got {}",
            config.worker_count
        )));
    }

    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be >= 1, got {}",
            config.retry_attempts
        )));
    }

    if config.eta_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "eta-interval must be >= 1, got {}",
            config.eta_interval
        )));
    }

    if config.projection_total < 1 {
        return Err(ConfigError::Validation(format!(
            "projection-total must be >= 1, got {}",
            config.projection_total
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.save_dir.is_empty() {
        return Err(ConfigError::Validation(
            "save-dir cannot be empty".to_string(),
        ));
    }

    if config.log_path.is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    if config.table_path.is_empty() {
        return Err(ConfigError::Validation(
            "table-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
