//! YAML loading with optional provenance instrumentation

use crate::error::{ConfigError, Result};
use crate::locate::KeyPositions;
use crate::settings::LoaderSettings;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One parsed configuration file
#[derive(Debug, Clone)]
pub struct LoadedYaml {
    /// Absolute path of the file
    pub path: PathBuf,

    /// Top-level mapping (empty for an empty document)
    pub data: Mapping,

    /// Located key positions; empty when instrumentation is off
    pub positions: KeyPositions,
}

impl LoadedYaml {
    /// Path rendered the way provenance records it
    pub fn source_file(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Parser for configuration files
#[derive(Debug, Clone)]
pub struct YamlParser {
    locate_keys: bool,
}

impl Default for YamlParser {
    fn default() -> Self {
        Self { locate_keys: true }
    }
}

impl YamlParser {
    /// Create a parser following the loader settings
    pub fn new(settings: &LoaderSettings) -> Self {
        Self {
            locate_keys: settings.locate_keys,
        }
    }

    /// Toggle key position scanning
    pub fn with_key_positions(mut self, enabled: bool) -> Self {
        self.locate_keys = enabled;
        self
    }

    /// Read and parse a file; the recorded path is made absolute
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedYaml> {
        let path = std::fs::canonicalize(path.as_ref())?;
        let text = std::fs::read_to_string(&path)?;
        let loaded = self.parse_str(path, &text)?;
        debug!(
            "Loaded {} ({} top-level keys, {} located)",
            loaded.path.display(),
            loaded.data.len(),
            loaded.positions.len()
        );
        Ok(loaded)
    }

    /// Parse YAML text attributed to `path`
    pub fn parse_str(&self, path: PathBuf, text: &str) -> Result<LoadedYaml> {
        let data = if is_blank_document(text) {
            Mapping::new()
        } else {
            let value: Value = serde_yaml::from_str(text).map_err(|source| ConfigError::YamlParse {
                path: path.clone(),
                source,
            })?;
            match value {
                Value::Mapping(map) => map,
                Value::Null => Mapping::new(),
                _ => return Err(ConfigError::NotAMapping(path)),
            }
        };

        let positions = if self.locate_keys {
            KeyPositions::scan(text)
        } else {
            KeyPositions::new()
        };

        Ok(LoadedYaml {
            path,
            data,
            positions,
        })
    }
}

/// Whether the text holds no content besides comments and markers
fn is_blank_document(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}
