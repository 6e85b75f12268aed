//! Link extraction and classification
//!
//! This module pulls every anchor and image reference out of a content
//! item's markup and runs each one through the ordered rule cascade that
//! decides whether it is a hard link, a discarded link or an x-id link.
//!
//! Whether a link is sent to the x-id resolver is decided by the rule that
//! matched, not by the bucket it lands in: two discard rules also request
//! resolution.

mod links;
mod normalize;
mod rules;

pub use links::collect_links;
pub use normalize::{normalize_link_url, platform_host, REQUEST_URL_STUB};
pub use rules::{classify_url, Classification, Rule};

use crate::model::{ContentType, Link};

/// A classified link together with its resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLink {
    pub link: Link,
    pub rule: Rule,
    /// True when the x-id resolver should run for this link
    pub needs_resolution: bool,
}

/// Extracts and classifies every link in a piece of markup
///
/// Links come out in lexicographic order of their `text: ...` / `alt: ...`
/// keys; each distinct key is scanned once. Empty URLs are skipped.
///
/// # Arguments
///
/// * `raw_text` - Markup of one content item
/// * `content_type` - The item's content type (rule 2 depends on it)
/// * `base_url` - Canonical base URL substituted for the request-URL template
///   token; its host marks absolute URLs as on-platform
///
/// # Examples
///
/// ```
/// use course_triage::classify::classify_links;
/// use course_triage::{ContentType, LinkCategory};
///
/// let html = r#"<a href="mycontent/page.html">Page</a><a href="https://example.com/">Out</a>"#;
/// let links = classify_links(html, ContentType::Unclassified, "https://lms.example.edu/");
///
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].link.display_text, "text: Out");
/// assert_eq!(links[0].link.category, LinkCategory::Discarded);
/// assert_eq!(links[1].link.category, LinkCategory::HardLink);
/// assert!(links[1].needs_resolution);
/// ```
pub fn classify_links(
    raw_text: &str,
    content_type: ContentType,
    base_url: &str,
) -> Vec<ClassifiedLink> {
    let host = platform_host(base_url);
    let mut classified = Vec::new();

    for (key, url) in collect_links(raw_text) {
        let url = url.trim();
        if url.is_empty() {
            continue;
        }

        let url = normalize_link_url(url, base_url);
        let classification = classify_url(&url, content_type, &host);
        tracing::trace!(
            "{} -> {} ({:?}, resolve: {})",
            url,
            classification.category,
            classification.rule,
            classification.resolve
        );

        classified.push(ClassifiedLink {
            link: Link::new(url, key.trim(), classification.category),
            rule: classification.rule,
            needs_resolution: classification.resolve,
        });
    }

    classified
}
