//! Link to stable reference matching

use crate::config::PlatformConfig;
use crate::model::{NON_ASCII_IN_LINK, NOT_FOUND_IN_COLLECTION};
use crate::xid::collection::{CollectionFile, CollectionIndex};
use crate::xid::distance::levenshtein;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use tracing::trace;

/// Suffix of a collection metadata file next to the file it describes
const METADATA_SUFFIX: &str = ".xml";

/// Resolves links to their stable content reference
#[derive(Debug, Clone)]
pub struct XidResolver {
    prefix: String,
    course_section: Regex,
}

impl XidResolver {
    /// Creates a resolver from platform settings
    ///
    /// # Returns
    ///
    /// * `Ok(XidResolver)` - Ready to resolve
    /// * `Err(ConfigError::InvalidPattern)` - The course-section pattern does not compile
    pub fn new(platform: &PlatformConfig) -> ConfigResult<Self> {
        let course_section = Regex::new(&platform.course_section_pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("course-section-pattern: {}", e))
        })?;

        Ok(Self {
            prefix: platform.xid_prefix.clone(),
            course_section,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolves one link
    ///
    /// The candidate set is every collection file named after the link's
    /// last path segment plus `.xml`. Never fails: a link with no candidate
    /// gets a sentinel instead.
    ///
    /// # Returns
    ///
    /// The prefixed stable reference, `NOT FOUND IN COLLECTION`, or
    /// `NON-ASCII CHARS IN LINK`
    pub fn resolve(&self, url: &str, index: &CollectionIndex) -> String {
        let expected = format!("{}{}", link_file_name(url), METADATA_SUFFIX);
        let candidates = index.candidates(&expected);

        let resolved = match candidates.as_slice() {
            [] if url.is_ascii() => NOT_FOUND_IN_COLLECTION.to_string(),
            [] => NON_ASCII_IN_LINK.to_string(),
            [only] => self.reference(only),
            many => self.closest(url, many),
        };

        trace!("{} -> {} ({} candidates)", url, resolved, candidates.len());
        resolved
    }

    /// Picks the candidate whose declared path is nearest to the link
    ///
    /// Ties go to the earlier candidate.
    fn closest(&self, url: &str, candidates: &[&CollectionFile]) -> String {
        let target = url.replace(' ', "%20");
        let mut best: Option<(&CollectionFile, usize)> = None;

        for candidate in candidates {
            let declared = self
                .course_section
                .replace_all(candidate.declared_path(), "");
            let distance = levenshtein(&target, &declared);

            if best.map_or(true, |(_, min)| distance < min) {
                best = Some((*candidate, distance));
            }
        }

        best.map(|(file, _)| self.reference(file))
            .unwrap_or_else(|| NOT_FOUND_IN_COLLECTION.to_string())
    }

    fn reference(&self, file: &CollectionFile) -> String {
        format!("{}{}", self.prefix, file.stable_id())
    }
}

/// Last `/`-separated segment of a link, ignoring trailing slashes
pub fn link_file_name(url: &str) -> &str {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}
