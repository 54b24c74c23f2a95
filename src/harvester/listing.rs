//! Listing page parsing
//!
//! Index pages mention items in two shapes: price-annotated info
//! containers and bare object links. Both carry the object id in a
//! `data-objectid` attribute; only the containers carry a price.

use scraper::{Html, Selector};

/// One item sighting on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Site-assigned object id
    pub id: String,

    /// Cleaned price text, if the sighting carried one
    pub price: Option<String>,
}

/// Extracts item sightings from one listing page
///
/// Price-annotated containers (`div.prices.objectInfos`) are read first,
/// then bare anchors (`a.objectLink`). The same id can show up in both
/// shapes on one page; the catalog dedups sightings, so this function
/// reports every one it finds.
///
/// # Arguments
///
/// * `html` - The listing page HTML
///
/// # Returns
///
/// Sightings in document order. Unparseable markup yields an empty list,
/// never an error.
pub fn parse_listing_page(html: &str) -> Vec<ListingEntry> {
    let document = Html::parse_document(html);
    let mut entries = Vec::new();

    if let Ok(info_selector) = Selector::parse("div.prices.objectInfos") {
        let price_selector = Selector::parse("p.pricetag").ok();

        for container in document.select(&info_selector) {
            let id = match container.value().attr("data-objectid") {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };

            let price = price_selector.as_ref().and_then(|selector| {
                container
                    .select(selector)
                    .next()
                    .and_then(|tag| clean_price_text(&tag.text().collect::<String>()))
            });

            entries.push(ListingEntry {
                id: id.to_string(),
                price,
            });
        }
    }

    if let Ok(link_selector) = Selector::parse("a.objectLink") {
        for anchor in document.select(&link_selector) {
            if let Some(id) = anchor.value().attr("data-objectid") {
                if !id.is_empty() {
                    entries.push(ListingEntry {
                        id: id.to_string(),
                        price: None,
                    });
                }
            }
        }
    }

    entries
}

/// Normalizes a raw price tag text
///
/// The site renders prices as "ab 120&nbsp;€"; the "ab" marker and
/// non-breaking spaces are noise. Text that cleans down to nothing
/// counts as no price.
fn clean_price_text(raw: &str) -> Option<String> {
    let cleaned = raw.replace("ab", "").replace('\u{a0}', "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_annotated_container() {
        let html = r#"
            <div class="prices objectInfos" data-objectid="1001">
                <p class="pricetag">ab 120&nbsp;€</p>
            </div>
        "#;
        let entries = parse_listing_page(html);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "1001");
        assert_eq!(entries[0].price.as_deref(), Some("120€"));
    }

    #[test]
    fn test_container_without_price_tag() {
        let html = r#"<div class="prices objectInfos" data-objectid="1001"></div>"#;
        let entries = parse_listing_page(html);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].price, None);
    }

    #[test]
    fn test_parse_bare_object_link() {
        let html = r#"<a class="objectLink" data-objectid="2002" href="/expose/2002">See it</a>"#;
        let entries = parse_listing_page(html);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "2002");
        assert_eq!(entries[0].price, None);
    }

    #[test]
    fn test_both_shapes_on_one_page() {
        let html = r#"
            <div class="prices objectInfos" data-objectid="1001">
                <p class="pricetag">ab 99&nbsp;€</p>
            </div>
            <a class="objectLink" data-objectid="1001" href="/expose/1001">Link</a>
            <a class="objectLink" data-objectid="2002" href="/expose/2002">Link</a>
        "#;
        let entries = parse_listing_page(html);

        // Duplicates survive here; the catalog dedups on record
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].id, "1001");
        assert_eq!(entries[0].price.as_deref(), Some("99€"));
        assert_eq!(entries[1].id, "1001");
        assert_eq!(entries[2].id, "2002");
    }

    #[test]
    fn test_missing_objectid_skipped() {
        let html = r#"
            <div class="prices objectInfos"><p class="pricetag">ab 50 €</p></div>
            <a class="objectLink" href="/expose/unknown">Link</a>
        "#;
        let entries = parse_listing_page(html);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_empty_objectid_skipped() {
        let html = r#"<a class="objectLink" data-objectid="" href="/x">Link</a>"#;
        let entries = parse_listing_page(html);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unrelated_markup_ignored() {
        let html = r#"
            <div class="prices" data-objectid="9"></div>
            <div class="objectInfos" data-objectid="9"></div>
            <a class="otherLink" data-objectid="9">Link</a>
        "#;
        let entries = parse_listing_page(html);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_clean_price_text_strips_marker_and_nbsp() {
        assert_eq!(clean_price_text("ab 120\u{a0}€"), Some("120€".to_string()));
        assert_eq!(clean_price_text("ab\u{a0}99\u{a0}€"), Some("99€".to_string()));
        assert_eq!(clean_price_text("150 €"), Some("150 €".to_string()));
    }

    #[test]
    fn test_clean_price_text_empty_is_none() {
        assert_eq!(clean_price_text(""), None);
        assert_eq!(clean_price_text("ab"), None);
        assert_eq!(clean_price_text(" \u{a0} "), None);
    }

    #[test]
    fn test_empty_page_yields_no_entries() {
        assert!(parse_listing_page("<html><body></body></html>").is_empty());
    }
}
