//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading, merging or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration directory does not exist
    #[error("Configuration directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML file could not be parsed
    #[error("Failed to parse YAML in {path}: {source}")]
    YamlParse {
        /// File being parsed
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// The top level of a configuration file is not a mapping
    #[error("Top level of {0} is not a mapping")]
    NotAMapping(PathBuf),

    /// YAML serialization error
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Loader settings failed validation
    #[error("Invalid loader settings: {0}")]
    InvalidSettings(String),
}
