//! Experiment configuration: layered YAML files plus provenance queries

use crate::error::{ConfigError, Result};
use crate::flatten::flatten_into;
use crate::merge::{deep_merge, get_path, merge_document};
use crate::settings::LoaderSettings;
use crate::yaml::{LoadedYaml, YamlParser};
use confprov_domain::{NoopSink, ProvenanceEntry, ProvenanceIndex, ProvenanceSink};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Top-level key holding the provenance tree in saved snapshots
pub const PROVENANCE_SECTION: &str = "PROVENANCE";

/// Configuration switch that turns tracking on from the data itself
pub const TRACK_PROVENANCE_PATH: &str = "CONFIG.TRACK_PROVENANCE";

/// Merged configuration of one experiment directory
///
/// Files directly inside the configuration directory are merged in file
/// name order, so a later file overrides an earlier one for both values and
/// provenance. Provenance is re-derived on every [`reload`](Self::reload);
/// it is never restored from a saved snapshot.
///
/// # Examples
///
/// ```no_run
/// use confprov_config::{ExperimentConfig, LoaderSettings};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = ExperimentConfig::new("/experiments/a000/conf", LoaderSettings::default());
/// config.set_track_provenance(true);
/// config.reload()?;
///
/// if let Some(source) = config.get_parameter_source("JOBS.SIM.WALLCLOCK") {
///     println!("WALLCLOCK set in {}", source["file"]);
/// }
/// config.save()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExperimentConfig {
    conf_dir: PathBuf,
    settings: LoaderSettings,
    parser: YamlParser,
    data: Mapping,
    loaded_files: Vec<PathBuf>,
    tracking_requested: bool,
    track_provenance: bool,
    tracker: Option<ProvenanceIndex>,
}

/// A saved snapshot split into its data and archived provenance
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Configuration data without the provenance section
    pub data: Mapping,

    /// Provenance re-hydrated from the snapshot; empty when none was saved
    pub provenance: ProvenanceIndex,
}

impl ExperimentConfig {
    /// Create an unloaded configuration for `conf_dir`
    pub fn new<P: Into<PathBuf>>(conf_dir: P, settings: LoaderSettings) -> Self {
        let parser = YamlParser::new(&settings);
        Self {
            conf_dir: conf_dir.into(),
            settings,
            parser,
            data: Mapping::new(),
            loaded_files: Vec::new(),
            tracking_requested: false,
            track_provenance: false,
            tracker: None,
        }
    }

    /// Configuration directory
    pub fn conf_dir(&self) -> &Path {
        &self.conf_dir
    }

    /// Loader settings in use
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Request tracking regardless of `CONFIG.TRACK_PROVENANCE`.
    ///
    /// Turning it on starts a fresh tracker immediately so single-file loads
    /// are tracked. Turning it off drops the tracker and everything it
    /// recorded; the next reload may turn tracking back on from the data.
    pub fn set_track_provenance(&mut self, enabled: bool) {
        self.tracking_requested = enabled;
        if !enabled {
            self.tracker = None;
            self.track_provenance = false;
        } else if self.tracker.is_none() {
            self.tracker = Some(ProvenanceIndex::new());
            self.track_provenance = true;
        }
    }

    /// Whether provenance was tracked by the last load
    pub fn track_provenance(&self) -> bool {
        self.track_provenance
    }

    /// Live provenance, when tracking is on
    pub fn tracker(&self) -> Option<&ProvenanceIndex> {
        self.tracker.as_ref()
    }

    /// Merged configuration data
    pub fn data(&self) -> &Mapping {
        &self.data
    }

    /// Files merged by the last reload, in merge order
    pub fn loaded_files(&self) -> &[PathBuf] {
        &self.loaded_files
    }

    /// Configuration files in merge order
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        if !self.conf_dir.is_dir() {
            return Err(ConfigError::MissingDirectory(self.conf_dir.clone()));
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.conf_dir)? {
            let path = entry?.path();
            if path.is_file() && self.settings.matches_extension(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Re-read every configuration file and rebuild provenance from scratch
    pub fn reload(&mut self) -> Result<()> {
        let files = self.discover_files()?;
        let docs = files
            .iter()
            .map(|file| self.parser.load(file))
            .collect::<Result<Vec<LoadedYaml>>>()?;

        let mut data = Mapping::new();
        for doc in &docs {
            deep_merge(&mut data, doc.data.clone());
        }

        self.track_provenance = self.tracking_requested || tracking_enabled_in(&data);
        self.tracker = if self.track_provenance {
            let mut index = ProvenanceIndex::new();
            for doc in &docs {
                let recorded = flatten_into(&mut index, &doc.data, &doc.source_file(), &doc.positions);
                debug!("Tracked {} parameters from {}", recorded, doc.path.display());
            }
            info!(
                "Provenance tracking enabled: {} parameters from {} files",
                index.len(),
                docs.len()
            );
            Some(index)
        } else {
            None
        };

        info!(
            "Loaded {} configuration files from {}",
            files.len(),
            self.conf_dir.display()
        );
        self.data = data;
        self.loaded_files = files;
        Ok(())
    }

    /// Merge a single file into `current`, tracking it when tracking is on
    pub fn load_config_file<P: AsRef<Path>>(&mut self, current: Mapping, path: P) -> Result<Mapping> {
        let doc = self.parser.load(path)?;
        let mut merged = current;

        let mut noop = NoopSink;
        let sink: &mut dyn ProvenanceSink = match self.tracker.as_mut() {
            Some(index) => index,
            None => &mut noop,
        };
        merge_document(&mut merged, &doc, sink);
        Ok(merged)
    }

    /// Value at a dotted path of the merged data
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.data, path)
    }

    /// Provenance of one parameter as its serialized mapping
    pub fn get_parameter_source(&self, path: &str) -> Option<serde_json::Value> {
        self.tracker
            .as_ref()?
            .lookup(path)
            .map(ProvenanceEntry::to_value)
    }

    /// Whole provenance tree; an empty mapping when tracking is off
    pub fn get_all_provenance(&self) -> serde_json::Value {
        match &self.tracker {
            Some(index) => index.export_to_value(),
            None => serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Write the provenance tree as JSON.
    ///
    /// Returns `false` without writing when tracking is off.
    pub fn export_provenance<P: AsRef<Path>>(&self, path: P) -> Result<bool> {
        let path = path.as_ref();
        let Some(index) = &self.tracker else {
            warn!("No provenance data to export; tracking is disabled");
            return Ok(false);
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&index.export_to_value())?;
        fs::write(path, contents)?;
        info!("Provenance exported to {} ({} parameters)", path.display(), index.len());
        Ok(true)
    }

    /// Snapshot location inside the configuration directory
    pub fn snapshot_path(&self) -> PathBuf {
        self.conf_dir
            .join(&self.settings.metadata_dir)
            .join(&self.settings.snapshot_file)
    }

    /// Where [`save`](Self::save) keeps the previous snapshot
    pub fn backup_path(&self) -> PathBuf {
        self.snapshot_path()
            .with_file_name(format!("{}.bak", self.settings.snapshot_file))
    }

    /// Save merged data, plus a `PROVENANCE` section when anything is tracked.
    ///
    /// An existing snapshot is copied to [`backup_path`](Self::backup_path)
    /// first, replacing any older backup.
    pub fn save(&self) -> Result<PathBuf> {
        let mut snapshot = self.data.clone();
        if let Some(index) = self.tracker.as_ref().filter(|index| !index.is_empty()) {
            let tree = serde_yaml::to_value(index.export_to_value())?;
            snapshot.insert(Value::String(PROVENANCE_SECTION.to_string()), tree);
        }

        let path = self.snapshot_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let backup = self.backup_path();
            fs::copy(&path, &backup)?;
            debug!("Backed up previous snapshot to {}", backup.display());
        }
        fs::write(&path, serde_yaml::to_string(&snapshot)?)?;
        info!("Saved configuration snapshot to {}", path.display());
        Ok(path)
    }

    /// Read a saved snapshot; its provenance is archival and separate from
    /// any live tracker
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
        let loaded = YamlParser::default()
            .with_key_positions(false)
            .load(path)?;
        let mut data = loaded.data;

        let provenance = match data.remove(PROVENANCE_SECTION) {
            Some(section) => ProvenanceIndex::from_value(&serde_json::to_value(section)?),
            None => ProvenanceIndex::new(),
        };
        debug!(
            "Read snapshot {} with {} archived provenance entries",
            loaded.path.display(),
            provenance.len()
        );
        Ok(Snapshot { data, provenance })
    }
}

/// Whether `CONFIG.TRACK_PROVENANCE` is set to true
fn tracking_enabled_in(data: &Mapping) -> bool {
    match get_path(data, TRACK_PROVENANCE_PATH) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_tracking_flag_detection() {
        assert!(tracking_enabled_in(&mapping("CONFIG:\n  TRACK_PROVENANCE: true\n")));
        assert!(tracking_enabled_in(&mapping("CONFIG:\n  TRACK_PROVENANCE: 'True'\n")));
        assert!(!tracking_enabled_in(&mapping("CONFIG:\n  TRACK_PROVENANCE: false\n")));
        assert!(!tracking_enabled_in(&mapping("CONFIG:\n  AUTOSUBMIT_VERSION: 4.1.0\n")));
    }

    #[test]
    fn test_defaults_before_load() {
        let config = ExperimentConfig::new("/nonexistent", LoaderSettings::default());
        assert!(!config.track_provenance());
        assert!(config.tracker().is_none());
        assert!(config.get_parameter_source("DEFAULT.EXPID").is_none());
        assert_eq!(config.get_all_provenance(), serde_json::json!({}));
    }

    #[test]
    fn test_requesting_tracking_starts_tracker() {
        let mut config = ExperimentConfig::new("/nonexistent", LoaderSettings::default());
        config.set_track_provenance(true);
        assert!(config.track_provenance());
        assert!(config.tracker().unwrap().is_empty());
    }

    #[test]
    fn test_turning_tracking_off_drops_tracker() {
        let mut config = ExperimentConfig::new("/nonexistent", LoaderSettings::default());
        config.set_track_provenance(true);
        config
            .tracker
            .as_mut()
            .unwrap()
            .record("DEFAULT.EXPID", "/conf/a.yml", Some(2), Some(3));

        config.set_track_provenance(false);
        assert!(!config.track_provenance());
        assert!(config.tracker().is_none());
        assert!(config.get_parameter_source("DEFAULT.EXPID").is_none());

        config.set_track_provenance(true);
        assert!(config.tracker().unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let mut config = ExperimentConfig::new("/nonexistent/conf", LoaderSettings::default());
        assert!(matches!(config.reload(), Err(ConfigError::MissingDirectory(_))));
    }

    #[test]
    fn test_snapshot_path() {
        let config = ExperimentConfig::new("/exp/conf", LoaderSettings::default());
        assert_eq!(config.snapshot_path(), PathBuf::from("/exp/conf/metadata/experiment_data.yml"));
        assert_eq!(config.backup_path(), PathBuf::from("/exp/conf/metadata/experiment_data.yml.bak"));
    }
}
