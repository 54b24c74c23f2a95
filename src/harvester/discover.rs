//! Listing discovery
//!
//! Walks the index pages one at a time, in page order, accumulating every
//! item sighting into a catalog. A page that cannot be fetched is reported
//! and skipped; discovery itself never fails.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::harvester::courtesy_delay;
use crate::harvester::fetcher::FetchClient;
use crate::harvester::listing::parse_listing_page;
use tracing::{info, warn};

/// Walks every configured index page and returns the accumulated catalog
///
/// Pages are fetched strictly sequentially, with a random courtesy delay
/// after each page that was actually served. Items seen on more than one
/// page are recorded once, with the last seen price.
///
/// # Arguments
///
/// * `client` - The shared fetch client
/// * `config` - The run configuration
pub async fn discover(client: &FetchClient, config: &Config) -> Catalog {
    let mut catalog = Catalog::new();

    for page in 1..=config.site.page_count {
        let url = page_url(&config.site.listing_url, page);
        info!(page, url = %url, "Fetching index page");

        match client.get(&url).await {
            Ok(response) => {
                let entries = parse_listing_page(&response.body);
                info!(page, count = entries.len(), "Found item sightings");

                for entry in entries {
                    let item_url = format!("{}{}", config.site.base_url, entry.id);
                    catalog.record(&entry.id, item_url, entry.price);
                }

                courtesy_delay(&config.client).await;
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to fetch index page");
            }
        }
    }

    info!(items = catalog.len(), "Discovery finished");
    catalog
}

/// Substitutes the page number into the listing URL template
fn page_url(template: &str, page: u32) -> String {
    template.replace("{page}", &page.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_substitution() {
        assert_eq!(
            page_url("https://example.com/catalog?page={page}", 7),
            "https://example.com/catalog?page=7"
        );
    }

    #[test]
    fn test_page_url_substitutes_every_occurrence() {
        assert_eq!(page_url("/{page}/list?p={page}", 3), "/3/list?p=3");
    }

    // Page walking against a live server is covered by the integration
    // tests, including the page-failure and dedup cases.
}
