//! Trait definitions for recording provenance
//!
//! Loaders record through a [`ProvenanceSink`] handed to them explicitly,
//! so "is tracking on" is decided once by whoever builds the sink.

use crate::ProvenanceEntry;

/// Destination for provenance recorded while merging configuration files
///
/// Implemented by [`crate::ProvenanceIndex`] and by [`NoopSink`] when
/// tracking is disabled.
pub trait ProvenanceSink {
    /// Record that `path` was last set by `source_file`
    fn record(&mut self, path: &str, source_file: &str, line: Option<i64>, column: Option<i64>);

    /// Look up the current provenance of `path`
    fn lookup(&self, path: &str) -> Option<&ProvenanceEntry>;
}

/// Sink that discards every recording
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ProvenanceSink for NoopSink {
    fn record(&mut self, _path: &str, _source_file: &str, _line: Option<i64>, _column: Option<i64>) {}

    fn lookup(&self, _path: &str) -> Option<&ProvenanceEntry> {
        None
    }
}
