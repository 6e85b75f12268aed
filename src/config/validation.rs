use crate::config::types::{Config, PlatformConfig, ReportConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_platform_config(&config.platform)?;
    validate_report_config(&config.report)?;
    Ok(())
}

/// Validates platform addressing
fn validate_platform_config(config: &PlatformConfig) -> Result<(), ConfigError> {
    validate_http_url("base-url", &config.base_url)?;
    validate_http_url("xid-prefix", &config.xid_prefix)?;
    validate_pattern("course-section-pattern", &config.course_section_pattern)?;
    Ok(())
}

/// Validates report output configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    validate_pattern("skip-name-pattern", &config.skip_name_pattern)?;
    Ok(())
}

/// Checks that a value parses as an absolute http(s) URL
fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", key, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            key,
            url.scheme()
        )));
    }

    Ok(())
}

/// Checks that a value compiles as a regex
fn validate_pattern(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "{} cannot be empty",
            key
        )));
    }

    Regex::new(value).map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", key, e)))?;
    Ok(())
}
