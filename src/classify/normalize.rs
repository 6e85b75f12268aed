use url::Url;

/// Template token the platform writes in place of its own base URL
pub const REQUEST_URL_STUB: &str = "@X@EmbeddedFile.requestUrlStub@X@";

/// Normalizes a trimmed link URL before classification
///
/// # Normalization Steps
///
/// 1. Replace the request-URL template token with `base_url`
/// 2. Lowercase the whole URL
/// 3. Strip one leading `%20`
/// 4. Remove every `%0d`
///
/// # Examples
///
/// ```
/// use course_triage::classify::normalize_link_url;
///
/// let url = normalize_link_url(
///     "@X@EmbeddedFile.requestUrlStub@X@bbcswebdav/xid-123456_1/File.PDF",
///     "https://lms.example.edu/",
/// );
/// assert_eq!(url, "https://lms.example.edu/bbcswebdav/xid-123456_1/file.pdf");
/// ```
pub fn normalize_link_url(url: &str, base_url: &str) -> String {
    let url = url.replace(REQUEST_URL_STUB, base_url).to_lowercase();

    let url = match url.strip_prefix("%20") {
        Some(rest) => rest.to_string(),
        None => url,
    };

    url.replace("%0d", "")
}

/// Lowercase host of the platform's base URL
///
/// Empty when the base URL has no host, in which case only the legacy
/// platform marker identifies on-platform links.
///
/// # Examples
///
/// ```
/// use course_triage::classify::platform_host;
///
/// assert_eq!(platform_host("https://LMS.example.edu/"), "lms.example.edu");
/// assert_eq!(platform_host("not a url"), "");
/// ```
pub fn platform_host(base_url: &str) -> String {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}
