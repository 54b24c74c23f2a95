//! Catalog of discovered items
//!
//! Discovery walks the listing index and records every item it sees here.
//! The catalog has set semantics on the item id: an id is recorded once,
//! no matter how many index pages mention it.

use std::collections::BTreeMap;

/// One discovered item: its id, detail-page URL, and advertised price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Site-assigned object id
    pub id: String,

    /// Absolute URL of the item's detail page
    pub url: String,

    /// Price text from the listing, if the index page showed one
    pub price: Option<String>,
}

impl ItemRecord {
    /// Price text for tabular output; missing prices render as "N/A"
    pub fn price_display(&self) -> &str {
        self.price.as_deref().unwrap_or("N/A")
    }
}

/// Accumulated discovery output, keyed and ordered by item id
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    items: BTreeMap<String, ItemRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Records a sighting of an item
    ///
    /// The first sighting fixes the id and URL. A later sighting never
    /// duplicates the record; it only updates the price, and only when it
    /// actually carries one, so the last seen price wins.
    ///
    /// # Arguments
    ///
    /// * `id` - Site-assigned object id
    /// * `url` - Detail-page URL for the item
    /// * `price` - Price text, if the listing showed one
    pub fn record(&mut self, id: &str, url: String, price: Option<String>) {
        match self.items.get_mut(id) {
            Some(existing) => {
                if price.is_some() {
                    existing.price = price;
                }
            }
            None => {
                self.items.insert(
                    id.to_string(),
                    ItemRecord {
                        id: id.to_string(),
                        url,
                        price,
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    /// Iterates records in id order
    pub fn records(&self) -> impl Iterator<Item = &ItemRecord> {
        self.items.values()
    }

    /// Consumes the catalog, yielding records in id order
    pub fn into_records(self) -> impl Iterator<Item = ItemRecord> {
        self.items.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new_item() {
        let mut catalog = Catalog::new();
        catalog.record("1001", "https://example.com/expose/1001".to_string(), None);

        assert_eq!(catalog.len(), 1);
        let item = catalog.get("1001").unwrap();
        assert_eq!(item.id, "1001");
        assert_eq!(item.url, "https://example.com/expose/1001");
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_duplicate_id_recorded_once() {
        let mut catalog = Catalog::new();
        catalog.record("1001", "https://example.com/expose/1001".to_string(), None);
        catalog.record("1001", "https://example.com/expose/1001".to_string(), None);

        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_last_seen_price_wins() {
        let mut catalog = Catalog::new();
        let url = "https://example.com/expose/1001".to_string();
        catalog.record("1001", url.clone(), Some("120€".to_string()));
        catalog.record("1001", url, Some("135€".to_string()));

        assert_eq!(catalog.get("1001").unwrap().price.as_deref(), Some("135€"));
    }

    #[test]
    fn test_priceless_sighting_keeps_known_price() {
        let mut catalog = Catalog::new();
        let url = "https://example.com/expose/1001".to_string();
        catalog.record("1001", url.clone(), Some("120€".to_string()));
        catalog.record("1001", url, None);

        assert_eq!(catalog.get("1001").unwrap().price.as_deref(), Some("120€"));
    }

    #[test]
    fn test_url_fixed_at_first_sighting() {
        let mut catalog = Catalog::new();
        catalog.record("1001", "https://example.com/expose/1001".to_string(), None);
        catalog.record("1001", "https://elsewhere.com/1001".to_string(), None);

        assert_eq!(
            catalog.get("1001").unwrap().url,
            "https://example.com/expose/1001"
        );
    }

    #[test]
    fn test_records_ordered_by_id() {
        let mut catalog = Catalog::new();
        catalog.record("30", "https://example.com/expose/30".to_string(), None);
        catalog.record("10", "https://example.com/expose/10".to_string(), None);
        catalog.record("20", "https://example.com/expose/20".to_string(), None);

        let ids: Vec<&str> = catalog.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_price_display_uses_sentinel() {
        let with_price = ItemRecord {
            id: "1".to_string(),
            url: "https://example.com/expose/1".to_string(),
            price: Some("99€".to_string()),
        };
        let without_price = ItemRecord {
            id: "2".to_string(),
            url: "https://example.com/expose/2".to_string(),
            price: None,
        };

        assert_eq!(with_price.price_display(), "99€");
        assert_eq!(without_price.price_display(), "N/A");
    }
}
