//! confprov Configuration Loader
//!
//! Loads an experiment's layered YAML configuration and records where each
//! parameter came from.
//!
//! The loader provides:
//! - Directory discovery and merge in file name order (last file wins)
//! - Key position scanning for line/column provenance
//! - Provenance queries, JSON export and snapshot save/load
//!
//! Tracking is enabled by `CONFIG.TRACK_PROVENANCE: true` in the data or by
//! [`ExperimentConfig::set_track_provenance`]. When it is off, loading goes
//! through a no-op sink and every query answers "unknown".
//!
//! # Examples
//!
//! ```no_run
//! use confprov_config::{ExperimentConfig, LoaderSettings};
//!
//! let mut config = ExperimentConfig::new("conf", LoaderSettings::default());
//! config.reload().unwrap();
//! config.export_provenance("provenance.json").unwrap();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod experiment;
pub mod flatten;
pub mod locate;
pub mod merge;
pub mod settings;
pub mod yaml;

pub use error::{ConfigError, Result};
pub use experiment::{ExperimentConfig, Snapshot, PROVENANCE_SECTION, TRACK_PROVENANCE_PATH};
pub use locate::KeyPositions;
pub use settings::LoaderSettings;
pub use yaml::{LoadedYaml, YamlParser};
