//! Detail-page field extraction
//!
//! Pulls the structured fields out of a saved detail page. Extraction is
//! pure text work: no I/O, no network, and no failures. A field the page
//! does not carry comes back as the `-` sentinel, so a half-empty page
//! still yields a complete row.

use scraper::{ElementRef, Html, Selector};

/// Sentinel for fields the page does not carry
pub const SENTINEL: &str = "-";

/// Structured fields of one detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFields {
    pub title: String,
    pub stars: String,
    pub reviews: String,
    pub bedrooms: String,
    pub size: String,
    pub max_people: String,
    pub features: String,
    pub latitude: String,
    pub longitude: String,
    pub description: String,
}

impl Default for ListingFields {
    /// All fields at the sentinel, the row for a page that yielded nothing
    fn default() -> Self {
        ListingFields {
            title: SENTINEL.to_string(),
            stars: SENTINEL.to_string(),
            reviews: SENTINEL.to_string(),
            bedrooms: SENTINEL.to_string(),
            size: SENTINEL.to_string(),
            max_people: SENTINEL.to_string(),
            features: SENTINEL.to_string(),
            latitude: SENTINEL.to_string(),
            longitude: SENTINEL.to_string(),
            description: SENTINEL.to_string(),
        }
    }
}

/// Extracts every field from a detail page
///
/// # Field sources
///
/// | Field | Source |
/// |-------|--------|
/// | title | `h1#title` |
/// | stars | `span.text-green_dark` |
/// | reviews | `span.text-mid_grey.font-normal.whitespace-nowrap`, parentheses stripped |
/// | bedrooms | first `figcaption` mentioning "Schlafzimmer" |
/// | size | first `figcaption` mentioning "m²" |
/// | max_people | first `figcaption` mentioning "Personen" |
/// | features | remaining `figcaption`s, joined with "; " |
/// | latitude / longitude | `figure#map` `data-lat` / `data-lon` |
/// | description | `div#manualBlock` |
///
/// Every value is cleaned of control characters that are illegal in
/// tabular output.
pub fn extract_fields(html: &str) -> ListingFields {
    let document = Html::parse_document(html);

    let title = select_text(&document, "h1#title");
    let stars = select_text(&document, "span.text-green_dark");
    let reviews = strip_parentheses(&select_text(
        &document,
        "span.text-mid_grey.font-normal.whitespace-nowrap",
    ));

    let bedrooms = figcaption_containing(&document, "Schlafzimmer");
    let size = figcaption_containing(&document, "m²");
    let max_people = figcaption_containing(&document, "Personen");

    let features = collect_features(&document, &bedrooms, &size, &max_people);
    let (latitude, longitude) = map_coordinates(&document);
    let description = select_text(&document, "div#manualBlock");

    ListingFields {
        title: clean_cell(&title),
        stars: clean_cell(&stars),
        reviews: clean_cell(&reviews),
        bedrooms: clean_cell(&bedrooms),
        size: clean_cell(&size),
        max_people: clean_cell(&max_people),
        features: clean_cell(&features),
        latitude: clean_cell(&latitude),
        longitude: clean_cell(&longitude),
        description: clean_cell(&description),
    }
}

/// Joins an element's text fragments, trimmed, with single spaces
fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match, or the sentinel
fn select_text(document: &Html, selector: &str) -> String {
    match Selector::parse(selector) {
        Ok(selector) => match document.select(&selector).next() {
            Some(element) => {
                let text = element_text(element);
                if text.is_empty() {
                    SENTINEL.to_string()
                } else {
                    text
                }
            }
            None => SENTINEL.to_string(),
        },
        Err(_) => SENTINEL.to_string(),
    }
}

/// Text of the first figcaption mentioning the needle, or the sentinel
fn figcaption_containing(document: &Html, needle: &str) -> String {
    if let Ok(selector) = Selector::parse("figcaption") {
        for caption in document.select(&selector) {
            let text = element_text(caption);
            if text.contains(needle) {
                return text;
            }
        }
    }

    SENTINEL.to_string()
}

/// Collects the leftover figcaptions as the feature list
///
/// Captions already claimed by the bedrooms, size, or max-people fields
/// are excluded, as are hint-styled captions and the liability and
/// booking boilerplate the site mixes into the gallery.
fn collect_features(document: &Html, bedrooms: &str, size: &str, max_people: &str) -> String {
    let known = [bedrooms, size, max_people];
    let mut features = Vec::new();

    if let Ok(selector) = Selector::parse("figcaption") {
        for caption in document.select(&selector) {
            if is_hint_caption(caption) {
                continue;
            }

            let text = element_text(caption);
            if text.is_empty() || text == SENTINEL {
                continue;
            }

            if known.iter().any(|value| **value != *SENTINEL && text == **value) {
                continue;
            }

            if text.contains("Haftung") || text.contains("Unterkunft") {
                continue;
            }

            features.push(text);
        }
    }

    if features.is_empty() {
        SENTINEL.to_string()
    } else {
        features.join("; ")
    }
}

/// The site styles informational hints as small grey captions
fn is_hint_caption(element: ElementRef) -> bool {
    let mut small = false;
    let mut grey = false;

    for class in element.value().classes() {
        if class == "text-sm" {
            small = true;
        }
        if class == "text-mid_grey" {
            grey = true;
        }
    }

    small && grey
}

/// Latitude and longitude from the map figure's data attributes
fn map_coordinates(document: &Html) -> (String, String) {
    if let Ok(selector) = Selector::parse("figure#map") {
        if let Some(figure) = document.select(&selector).next() {
            let latitude = figure
                .value()
                .attr("data-lat")
                .unwrap_or(SENTINEL)
                .to_string();
            let longitude = figure
                .value()
                .attr("data-lon")
                .unwrap_or(SENTINEL)
                .to_string();
            return (latitude, longitude);
        }
    }

    (SENTINEL.to_string(), SENTINEL.to_string())
}

/// Review counts render as "(27)"; the parentheses are noise
fn strip_parentheses(text: &str) -> String {
    text.replace('(', "").replace(')', "").trim().to_string()
}

/// Removes control characters that tabular writers reject
///
/// Tab, newline, and carriage return survive; the rest of the C0 range
/// is dropped.
fn clean_cell(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let html = r#"<html><body><h1 id="title">Ferienwohnung Seeblick</h1></body></html>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.title, "Ferienwohnung Seeblick");
    }

    #[test]
    fn test_missing_title_is_sentinel() {
        let html = r#"<html><body><h1>No id here</h1></body></html>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.title, "-");
    }

    #[test]
    fn test_extract_stars() {
        let html = r#"<span class="text-green_dark">4.8</span>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.stars, "4.8");
    }

    #[test]
    fn test_reviews_parentheses_stripped() {
        let html = r#"<span class="text-mid_grey font-normal whitespace-nowrap">(27)</span>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.reviews, "27");
    }

    #[test]
    fn test_figcaption_fields() {
        let html = r#"
            <figure><figcaption>2 Schlafzimmer</figcaption></figure>
            <figure><figcaption>65 m²</figcaption></figure>
            <figure><figcaption>4 Personen</figcaption></figure>
        "#;
        let fields = extract_fields(html);

        assert_eq!(fields.bedrooms, "2 Schlafzimmer");
        assert_eq!(fields.size, "65 m²");
        assert_eq!(fields.max_people, "4 Personen");
    }

    #[test]
    fn test_features_exclude_claimed_and_boilerplate_captions() {
        let html = r#"
            <figure><figcaption>2 Schlafzimmer</figcaption></figure>
            <figure><figcaption>65 m²</figcaption></figure>
            <figure><figcaption>4 Personen</figcaption></figure>
            <figure><figcaption>WLAN</figcaption></figure>
            <figure><figcaption>Pool</figcaption></figure>
            <figure><figcaption>Keine Haftung für Angaben</figcaption></figure>
            <figure><figcaption>Beliebte Unterkunft</figcaption></figure>
            <figure><figcaption class="text-sm text-mid_grey">Nur ein Hinweis</figcaption></figure>
        "#;
        let fields = extract_fields(html);
        assert_eq!(fields.features, "WLAN; Pool");
    }

    #[test]
    fn test_features_sentinel_when_nothing_remains() {
        let html = r#"<figure><figcaption>3 Personen</figcaption></figure>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.features, "-");
    }

    #[test]
    fn test_map_coordinates() {
        let html = r#"<figure id="map" data-lat="54.18" data-lon="7.88"></figure>"#;
        let fields = extract_fields(html);

        assert_eq!(fields.latitude, "54.18");
        assert_eq!(fields.longitude, "7.88");
    }

    #[test]
    fn test_map_without_attributes() {
        let html = r#"<figure id="map"></figure>"#;
        let fields = extract_fields(html);

        assert_eq!(fields.latitude, "-");
        assert_eq!(fields.longitude, "-");
    }

    #[test]
    fn test_extract_description() {
        let html = r#"<div id="manualBlock"><p>Gemütliche Wohnung</p><p>direkt am Strand.</p></div>"#;
        let fields = extract_fields(html);
        assert_eq!(fields.description, "Gemütliche Wohnung direkt am Strand.");
    }

    #[test]
    fn test_empty_page_is_all_sentinels() {
        let fields = extract_fields("<html><body></body></html>");
        assert_eq!(fields, ListingFields::default());
    }

    #[test]
    fn test_clean_cell_drops_control_characters() {
        assert_eq!(clean_cell("bad\u{0}text\u{1f}"), "badtext");
        assert_eq!(clean_cell("keeps\ttabs\nand\rbreaks"), "keeps\ttabs\nand\rbreaks");
    }

    #[test]
    fn test_control_characters_cleaned_from_extracted_text() {
        let html = "<h1 id=\"title\">Titel\u{8} mit Resten</h1>";
        let fields = extract_fields(html);
        assert_eq!(fields.title, "Titel mit Resten");
    }
}
