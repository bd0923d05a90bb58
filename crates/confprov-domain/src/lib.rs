//! confprov Domain Layer
//!
//! This crate holds the provenance model for layered YAML configuration:
//! which file, line and column produced each configuration parameter.
//! It has no I/O and no knowledge of YAML; loaders feed it dotted parameter
//! paths and read back entries or nested trees.
//!
//! ## Key Concepts
//!
//! - **ProvenanceEntry**: origin of one value (file, line, column, capture time)
//! - **ProvenanceIndex**: dotted path → entry, last recording wins
//! - **ProvenanceTree**: nested projection shaped like the configuration itself
//! - **ProvenanceSink**: the seam loaders record through (index or no-op)
//!
//! ## Example
//!
//! ```
//! use confprov_domain::ProvenanceIndex;
//!
//! let mut index = ProvenanceIndex::new();
//! index.record("DEFAULT.EXPID", "/conf/a.yml", Some(2), None);
//! index.record("JOBS.SIM.WALLCLOCK", "/conf/b.yml", Some(23), Some(7));
//!
//! let tree = index.export_to_value();
//! assert_eq!(tree["JOBS"]["SIM"]["WALLCLOCK"]["col"], 7);
//!
//! let mut restored = ProvenanceIndex::new();
//! restored.import_from_value(&tree, "");
//! assert_eq!(restored.lookup("DEFAULT.EXPID").unwrap().source_file, "/conf/a.yml");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod index;
pub mod provenance;
pub mod traits;
pub mod tree;

// Re-exports for convenience
pub use error::{ProvenanceError, Result};
pub use index::ProvenanceIndex;
pub use provenance::ProvenanceEntry;
pub use traits::{NoopSink, ProvenanceSink};
pub use tree::ProvenanceTree;

/// Separator between segments of a dotted parameter path
pub const PATH_SEPARATOR: char = '.';
