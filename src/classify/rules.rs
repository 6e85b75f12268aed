//! The ordered link classification cascade
//!
//! Rules are checked in sequence and the first match wins. Later rules assume
//! every earlier one failed, so the order is load-bearing.

use crate::model::{ContentType, LinkCategory};

/// Webmail redirect gateway; students cannot sign in to it
const REDIRECT_GATEWAY: &str = "iris.nau.edu/owa/redir.aspx";

/// Publisher test-bank image folder
const TEST_TOOL_SEGMENT: &str = "ppg/";

/// Embedded-file location token (matched after lowercasing)
const EMBEDDED_LOCATION_TOKEN: &str = "@x@embeddedfile.location@x@";

/// Markers of a stable content-collection reference
const XID_MARKER: &str = "xid";
const FILE_STORE_SEGMENT: &str = "bbcswebdav";

/// Host fragment of the retired platform, still found in old course copies
const LEGACY_PLATFORM_MARKER: &str = "vista";

/// Images inserted by the content editor
const EDITOR_IMAGE_SEGMENT: &str = "/images/ci/";

/// Path segments that point into the platform
const PLATFORM_SEGMENTS: &[&str] = &["courses", "webapp", "bbcswebdav", "webct", "vista"];

/// Platform areas whose links are managed by the platform or integrations
const MANAGED_SEGMENTS: &[&str] = &[
    "/institution/",
    "execute/viewdocumentation?",
    "wvms-bb-bblearn",
    "bb-collaborate-bblearn",
    "webapps/vtbe-tinymce/tiny_mce",
    "webapps/login",
    "webapps/portal",
    "bbgs-nbc-content-integration-bblearn",
    "bb-selfpear-bblearn",
];

/// Prefixes of references that are never relative content links
const NON_RELATIVE_PREFIXES: &[&str] = &[
    "https://",
    "http://",
    "javascript:",
    "mailto:",
    "#",
    "data:image/",
];

/// Fragments of generic external hosts
const EXTERNAL_HOST_MARKERS: &[&str] = &[
    "webapp",
    ".com",
    ".net",
    ".edu",
    ".org",
    "//cdn.slidesharecdn.com/",
];

/// The cascade rule that decided a link's category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// 1: webmail redirect gateway
    RedirectGateway,
    /// 2a: publisher test-tool image inside an assessment
    TestToolImage,
    /// 2b: `about:blank` or an embedded-file location
    BlankOrEmbedded,
    /// 3: stable collection reference
    XidReference,
    /// 4: absolute URL off the platform
    ExternalSite,
    /// 5: content-editor image
    EditorImage,
    /// 6: hand-copied platform URL
    PlatformInternal,
    /// 7: relative reference into the export
    RelativeReference,
    /// 8: nothing matched
    Fallback,
}

impl Rule {
    /// Position in the cascade, starting at 1
    pub fn number(&self) -> u8 {
        match self {
            Self::RedirectGateway => 1,
            Self::TestToolImage | Self::BlankOrEmbedded => 2,
            Self::XidReference => 3,
            Self::ExternalSite => 4,
            Self::EditorImage => 5,
            Self::PlatformInternal => 6,
            Self::RelativeReference => 7,
            Self::Fallback => 8,
        }
    }

    /// Bucket assigned by this rule
    pub fn category(&self) -> LinkCategory {
        match self {
            Self::RedirectGateway | Self::PlatformInternal | Self::RelativeReference => {
                LinkCategory::HardLink
            }
            Self::XidReference => LinkCategory::XidLink,
            Self::TestToolImage
            | Self::BlankOrEmbedded
            | Self::ExternalSite
            | Self::EditorImage
            | Self::Fallback => LinkCategory::Discarded,
        }
    }

    /// Whether this rule requests x-id resolution
    ///
    /// Independent of the bucket: both rule 2 cases are discarded but still
    /// resolved.
    pub fn requests_resolution(&self) -> bool {
        matches!(
            self,
            Self::RedirectGateway
                | Self::TestToolImage
                | Self::BlankOrEmbedded
                | Self::PlatformInternal
                | Self::RelativeReference
        )
    }
}

/// Outcome of classifying one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub rule: Rule,
    pub category: LinkCategory,
    pub resolve: bool,
}

impl From<Rule> for Classification {
    fn from(rule: Rule) -> Self {
        Self {
            rule,
            category: rule.category(),
            resolve: rule.requests_resolution(),
        }
    }
}

/// Classifies a normalized URL
///
/// # Arguments
///
/// * `url` - URL already passed through `normalize_link_url` (lowercase)
/// * `content_type` - Content type of the item the link was found in
/// * `platform_host` - Lowercase host of the configured base URL; absolute
///   URLs containing it are not external (see `platform_host`)
///
/// # Examples
///
/// ```
/// use course_triage::classify::{classify_url, Rule};
/// use course_triage::{ContentType, LinkCategory};
///
/// let c = classify_url("mycontent/page.html", ContentType::Unclassified, "lms.example.edu");
/// assert_eq!(c.rule, Rule::RelativeReference);
/// assert_eq!(c.category, LinkCategory::HardLink);
/// assert!(c.resolve);
///
/// let c = classify_url(
///     "https://lms.example.edu/webapps/blackboard/content/x.jsp",
///     ContentType::Unclassified,
///     "lms.example.edu",
/// );
/// assert_eq!(c.rule, Rule::PlatformInternal);
/// ```
pub fn classify_url(url: &str, content_type: ContentType, platform_host: &str) -> Classification {
    match_rule(url, content_type, platform_host).into()
}

fn match_rule(url: &str, content_type: ContentType, platform_host: &str) -> Rule {
    if url.contains(REDIRECT_GATEWAY) {
        return Rule::RedirectGateway;
    }

    if url.contains(TEST_TOOL_SEGMENT) && content_type == ContentType::Assessment {
        return Rule::TestToolImage;
    }
    if url == "about:blank" || url.contains(EMBEDDED_LOCATION_TOKEN) {
        return Rule::BlankOrEmbedded;
    }

    if url.contains(XID_MARKER) && url.contains(FILE_STORE_SEGMENT) {
        return Rule::XidReference;
    }

    if is_absolute(url) && !is_platform_url(url, platform_host) {
        return Rule::ExternalSite;
    }

    if url.contains(EDITOR_IMAGE_SEGMENT) {
        return Rule::EditorImage;
    }

    if contains_any(url, PLATFORM_SEGMENTS) && !contains_any(url, MANAGED_SEGMENTS) {
        return Rule::PlatformInternal;
    }

    if !NON_RELATIVE_PREFIXES.iter().any(|p| url.starts_with(p))
        && !contains_any(url, EXTERNAL_HOST_MARKERS)
    {
        return Rule::RelativeReference;
    }

    Rule::Fallback
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("www")
}

fn is_platform_url(url: &str, platform_host: &str) -> bool {
    (!platform_host.is_empty() && url.contains(platform_host))
        || url.contains(LEGACY_PLATFORM_MARKER)
}

fn contains_any(url: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| url.contains(n))
}
