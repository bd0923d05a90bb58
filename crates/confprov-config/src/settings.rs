//! Loader settings
//!
//! Controls which files are picked up from a configuration directory,
//! whether key positions are located, and where snapshots are written.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for configuration discovery and provenance instrumentation
///
/// # Examples
///
/// ```
/// use confprov_config::LoaderSettings;
///
/// let settings = LoaderSettings::default();
/// assert!(settings.locate_keys);
/// assert!(settings.matches_extension("jobs.yml"));
/// assert!(!settings.matches_extension("notes.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Record line and column for block-style keys
    /// Default: true
    #[serde(default = "default_true")]
    pub locate_keys: bool,

    /// File extensions treated as configuration files
    /// Default: ["yml", "yaml"]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Subdirectory of the configuration directory holding snapshots
    /// Default: "metadata"
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: String,

    /// Snapshot file name inside the metadata directory
    /// Default: "experiment_data.yml"
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

fn default_metadata_dir() -> String {
    "metadata".to_string()
}

fn default_snapshot_file() -> String {
    "experiment_data.yml".to_string()
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            locate_keys: true,
            extensions: default_extensions(),
            metadata_dir: default_metadata_dir(),
            snapshot_file: default_snapshot_file(),
        }
    }
}

impl LoaderSettings {
    /// File-level provenance only, no key positions
    pub fn file_level() -> Self {
        Self {
            locate_keys: false,
            ..Self::default()
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "extensions must not be empty".to_string(),
            ));
        }
        if self.metadata_dir.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "metadata_dir must not be empty".to_string(),
            ));
        }
        if self.snapshot_file.is_empty() {
            return Err(ConfigError::InvalidSettings(
                "snapshot_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a file name carries one of the configured extensions
    pub fn matches_extension<P: AsRef<Path>>(&self, file: P) -> bool {
        file.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = LoaderSettings::default();
        assert!(settings.locate_keys);
        assert_eq!(settings.extensions, vec!["yml", "yaml"]);
        assert_eq!(settings.metadata_dir, "metadata");
        assert_eq!(settings.snapshot_file, "experiment_data.yml");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_file_level_preset() {
        let settings = LoaderSettings::file_level();
        assert!(!settings.locate_keys);
        assert_eq!(settings.extensions, LoaderSettings::default().extensions);
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let settings: LoaderSettings = toml::from_str(
            r#"
            locate_keys = false
            extensions = ["yml"]
        "#,
        )
        .unwrap();

        assert!(!settings.locate_keys);
        assert_eq!(settings.extensions, vec!["yml"]);
        assert_eq!(settings.snapshot_file, "experiment_data.yml");
    }

    #[test]
    fn test_validation_rejects_empty_extensions() {
        let settings = LoaderSettings {
            extensions: Vec::new(),
            ..LoaderSettings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::InvalidSettings(_))));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let settings = LoaderSettings::default();
        assert!(settings.matches_extension("/conf/JOBS.YML"));
        assert!(settings.matches_extension("platforms.yaml"));
        assert!(!settings.matches_extension("README"));
    }
}
