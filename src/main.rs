//! Fewo-Harvest main entry point
//!
//! This is the command-line interface for the Fewo-Harvest catalog harvester.

use clap::Parser;
use fewo_harvest::config::load_config_with_hash;
use fewo_harvest::harvester::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Fewo-Harvest: A polite catalog harvester
///
/// Fewo-Harvest walks a paginated listing index, downloads every detail
/// page it discovers into a local cache, and records each item in a CSV
/// catalog table. Interrupted runs resume from the cache, and finished
/// runs can be enriched offline with extracted detail fields.
#[derive(Parser, Debug)]
#[command(name = "fewo-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with_all = ["stats", "extract"])]
    dry_run: bool,

    /// Show cache and outcome-log statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "extract"])]
    stats: bool,

    /// Enrich the catalog table from cached pages and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    extract: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.extract {
        handle_extract(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("fewo_harvest=info,warn"),
            1 => EnvFilter::new("fewo_harvest=debug,info"),
            2 => EnvFilter::new("fewo_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the harvest plan
fn handle_dry_run(config: &fewo_harvest::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Fewo-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Index pages: {}", config.site.page_count);

    println!("\nClient:");
    println!("  User agent: {}", config.client.user_agent);
    println!("  Request timeout: {}s", config.client.timeout_secs);
    println!("  Transient retry limit: {}", config.client.retry_limit);
    println!(
        "  Transient statuses: {:?}",
        config.client.transient_statuses
    );
    println!(
        "  Courtesy delay: {}-{}ms",
        config.client.courtesy_delay_min_ms, config.client.courtesy_delay_max_ms
    );

    println!("\nDownload:");
    println!("  Workers: {}", config.download.worker_count);
    println!("  Attempts per item: {}", config.download.retry_attempts);
    println!("  Progress interval: {}", config.download.eta_interval);
    println!("  Projection total: {}", config.download.projection_total);

    println!("\nOutput:");
    println!("  Save directory: {}", config.output.save_dir);
    println!("  Outcome log: {}", config.output.log_path);
    println!("  Catalog table: {}", config.output.table_path);

    println!("\n✓ Configuration is valid");
    println!("✓ Would walk {} index pages", config.site.page_count);

    Ok(())
}

/// Handles the --stats mode: shows cache and outcome-log statistics
fn handle_stats(config: &fewo_harvest::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use fewo_harvest::cache::FsCache;
    use fewo_harvest::report::read_log_summary;
    use std::path::Path;

    println!("Cache: {}", config.output.save_dir);
    let cache = FsCache::new(&config.output.save_dir);
    println!("  Cached pages: {}", cache.count());

    println!("\nOutcome log: {}", config.output.log_path);
    let log_path = Path::new(&config.output.log_path);
    if log_path.exists() {
        let summary = read_log_summary(log_path)?;
        println!("  Success lines: {}", summary.success_lines);
        println!("  Error lines: {}", summary.error_lines);
        println!("  Total: {}", summary.total());
    } else {
        println!("  No log yet");
    }

    Ok(())
}

/// Handles the --extract mode: enriches the catalog table from the cache
fn handle_extract(config: &fewo_harvest::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use fewo_harvest::cache::FsCache;
    use fewo_harvest::table::enrich_table;
    use std::path::Path;

    println!("=== Enriching Catalog Table ===\n");
    println!("Table: {}", config.output.table_path);
    println!("Cache: {}", config.output.save_dir);
    println!();

    let cache = FsCache::new(&config.output.save_dir);

    tracing::info!("Extracting fields from cached pages...");
    let summary = enrich_table(Path::new(&config.output.table_path), &cache)?;

    println!(
        "✓ Enriched {} rows ({} without a cached page)",
        summary.rows, summary.missing
    );

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: fewo_harvest::config::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Walking {} index pages with {} download workers",
        config.site.page_count,
        config.download.worker_count
    );

    match run_harvest(config).await {
        Ok(summary) => {
            tracing::info!(
                "Harvest completed: {} discovered, {} downloaded, {} skipped, {} failed",
                summary.discovered,
                summary.downloaded,
                summary.skipped,
                summary.failed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
