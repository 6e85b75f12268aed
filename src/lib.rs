//! Course-Triage: hard-link triage for LMS course exports
//!
//! This crate walks an extracted course export, pulls every hyperlink and image
//! reference out of its content items, and sorts each one into hard links
//! (fragile, will break on course copy), discarded links (benign) and x-id links
//! (already using the platform's stable content reference). Hard links are
//! matched back to the content collection to suggest their stable replacement.

pub mod classify;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod manifest;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod xid;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Course-Triage operations
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Descriptor error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to scan export {path}: {message}")]
    Ingest { path: PathBuf, message: String },

    #[error("Run cancelled before {remaining} items were processed")]
    Cancelled { remaining: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// Errors raised while reading a single content descriptor.
///
/// These never abort a run: the offending item is logged and skipped.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("Unsupported descriptor type: {0}")]
    Unsupported(PathBuf),
}

/// Errors raised while loading the course navigation manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed manifest XML: {0}")]
    Xml(String),

    #[error("Manifest has no navigation tree")]
    Empty,
}

/// Result type alias for Course-Triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for descriptor extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for manifest operations
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

// Re-export commonly used types
pub use classify::{classify_links, classify_url, Classification};
pub use config::Config;
pub use manifest::NavigationTree;
pub use model::{ContentItem, ContentType, Link, LinkCategory, NOT_DEPLOYED};
pub use pipeline::{process_export, TriageReport};
pub use xid::{CollectionIndex, XidResolver};
