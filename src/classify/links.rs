//! Anchor and image collection from markup

use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// Collects every anchor `href` and image `src` from markup
///
/// Anchors are keyed `text: <anchor text>` and images `alt: <alt text>`.
/// The map is ordered by key, and a later element with the same key replaces
/// an earlier one, so each key is scanned exactly once. Anchor text is
/// whitespace-collapsed; a missing attribute yields an empty URL.
pub fn collect_links(markup: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(markup);
    let mut links = BTreeMap::new();

    if let Ok(a_selector) = Selector::parse("a") {
        for element in document.select(&a_selector) {
            let text = element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ");
            let href = element.value().attr("href").unwrap_or_default();
            links.insert(format!("text: {}", text), href.to_string());
        }
    }

    if let Ok(img_selector) = Selector::parse("img") {
        for element in document.select(&img_selector) {
            let alt = element.value().attr("alt").unwrap_or_default();
            let src = element.value().attr("src").unwrap_or_default();
            links.insert(format!("alt: {}", alt), src.to_string());
        }
    }

    links
}
