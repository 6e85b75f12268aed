//! Configuration module for Course-Triage
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional: a missing file section falls back to the built-in
//! platform defaults.
//!
//! # Example
//!
//! ```no_run
//! use course_triage::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("triage.toml")).unwrap();
//! println!("Stable links will use: {}", config.platform.xid_prefix);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, PlatformConfig, ReportConfig, DEFAULT_BASE_URL, DEFAULT_COURSE_SECTION_PATTERN,
    DEFAULT_SKIP_NAME_PATTERN, DEFAULT_XID_PREFIX,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, hash_config_content, load_config, load_config_with_hash, parse_config,
};
pub use validation::validate;
