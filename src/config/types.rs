use serde::Deserialize;

/// Base URL the `@X@EmbeddedFile.requestUrlStub@X@` template token stands for
pub const DEFAULT_BASE_URL: &str = "https://bblearn.nau.edu/";

/// Prefix of a stable content-collection reference; the numeric id is appended
pub const DEFAULT_XID_PREFIX: &str = "https://bblearn.nau.edu/bbcswebdav/xid-";

/// Course-section folder prefix stripped from collection paths before fuzzy matching
pub const DEFAULT_COURSE_SECTION_PATTERN: &str =
    "/courses/[0-9]{4}-NAU[0-9]{2}-[A-Z]{2,4}-[0-9]{3}[A-Z]{0,2}-SEC[0-9A-Z]{1,4}-[0-9]{2,5}.NAU-PSSIS/";

/// Page names matching this are media wrappers and are left out of page reports
pub const DEFAULT_SKIP_NAME_PATTERN: &str = "(DVD|VT)[0-9]{1,6}_";

/// Main configuration structure for Course-Triage
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Platform addressing used by normalization and x-id resolution
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Canonical base URL of the LMS
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Prefix for synthesized stable references
    #[serde(rename = "xid-prefix")]
    pub xid_prefix: String,

    /// Regex matching the course-section folder inside collection identifiers
    #[serde(rename = "course-section-pattern")]
    pub course_section_pattern: String,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            xid_prefix: DEFAULT_XID_PREFIX.to_string(),
            course_section_pattern: DEFAULT_COURSE_SECTION_PATTERN.to_string(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory the report files are written to
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Regex for page names excluded from the page sections
    #[serde(rename = "skip-name-pattern")]
    pub skip_name_pattern: String,

    /// Write the markdown report
    #[serde(rename = "write-markdown")]
    pub write_markdown: bool,

    /// Write the SQLite report
    #[serde(rename = "write-database")]
    pub write_database: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            skip_name_pattern: DEFAULT_SKIP_NAME_PATTERN.to_string(),
            write_markdown: true,
            write_database: true,
        }
    }
}
