//! Flat provenance index keyed by dotted parameter path

use crate::provenance::ProvenanceEntry;
use crate::traits::ProvenanceSink;
use crate::tree::ProvenanceTree;
use crate::PATH_SEPARATOR;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Provenance of every tracked configuration parameter
///
/// Paths are opaque keys: no normalization or validation is applied, so
/// `""`, `".A"` and `"A..B"` are all distinct, legal paths. Recording a path
/// that is already present replaces its entry entirely ("last file wins").
///
/// # Examples
///
/// ```
/// use confprov_domain::ProvenanceIndex;
///
/// let mut index = ProvenanceIndex::new();
/// index.record("DEFAULT.OVERRIDE_TEST", "/conf/first.yml", None, None);
/// index.record("DEFAULT.OVERRIDE_TEST", "/conf/second.yml", None, None);
///
/// assert_eq!(index.len(), 1);
/// assert_eq!(index.lookup("DEFAULT.OVERRIDE_TEST").unwrap().source_file, "/conf/second.yml");
/// assert!(index.lookup("DEFAULT.UNKNOWN").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceIndex {
    entries: HashMap<String, ProvenanceEntry>,
}

impl ProvenanceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh entry for `path`, replacing any previous one
    pub fn record<S, P>(&mut self, path: S, source_file: P, line: Option<i64>, column: Option<i64>)
    where
        S: Into<String>,
        P: AsRef<Path>,
    {
        self.insert(path, ProvenanceEntry::at(source_file, line, column));
    }

    /// Store a prebuilt entry for `path`, replacing any previous one
    pub fn insert<S: Into<String>>(&mut self, path: S, entry: ProvenanceEntry) {
        self.entries.insert(path.into(), entry);
    }

    /// Current provenance of `path`
    pub fn lookup(&self, path: &str) -> Option<&ProvenanceEntry> {
        self.entries.get(path)
    }

    /// Whether `path` has a current entry
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of distinct paths held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `(path, entry)` pairs in sorted path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProvenanceEntry)> {
        let mut pairs: Vec<_> = self
            .entries
            .iter()
            .map(|(path, entry)| (path.as_str(), entry))
            .collect();
        pairs.sort_unstable_by(|a, b| a.0.cmp(b.0));
        pairs.into_iter()
    }

    /// Project the index onto a nested tree.
    ///
    /// Paths are placed in sorted order. When a path runs through a position
    /// that already holds a leaf (both `"A"` and `"A.B"` recorded) the longer
    /// path is skipped silently; only well-formed configuration data exports
    /// every entry.
    pub fn export_tree(&self) -> ProvenanceTree {
        let mut tree = ProvenanceTree::new();
        for (path, entry) in self.iter() {
            let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
            tree.insert(&segments, entry.clone());
        }
        tree
    }

    /// Project the index onto its persisted nested form
    pub fn export_to_value(&self) -> Value {
        self.export_tree().to_value()
    }

    /// Record every leaf of `tree` below `path_prefix`
    pub fn import_tree(&mut self, tree: &ProvenanceTree, path_prefix: &str) {
        tree.for_each_leaf(path_prefix, &mut |path, entry| {
            self.entries.insert(path, entry.clone());
        });
    }

    /// Record every leaf of a persisted tree below `path_prefix`.
    ///
    /// Import is tolerant: non-mapping values are ignored and a leaf that
    /// cannot be decoded is skipped, while its siblings are still recorded.
    /// Returns the number of entries recorded.
    pub fn import_from_value(&mut self, value: &Value, path_prefix: &str) -> usize {
        let tree = ProvenanceTree::from_value(value);
        self.import_tree(&tree, path_prefix);
        tree.leaf_count()
    }

    /// Build a fresh index from a persisted tree
    pub fn from_value(value: &Value) -> Self {
        let mut index = Self::new();
        index.import_from_value(value, "");
        index
    }
}

impl ProvenanceSink for ProvenanceIndex {
    fn record(&mut self, path: &str, source_file: &str, line: Option<i64>, column: Option<i64>) {
        ProvenanceIndex::record(self, path, source_file, line, column);
    }

    fn lookup(&self, path: &str) -> Option<&ProvenanceEntry> {
        ProvenanceIndex::lookup(self, path)
    }
}

impl fmt::Display for ProvenanceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.len();
        let noun = if count == 1 { "parameter" } else { "parameters" };
        write!(f, "ProvenanceIndex({} {} tracked)", count, noun)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[A-Z][A-Z_]{0,6}"
    }

    proptest! {
        /// Property: export then import into a fresh index reproduces every entry
        #[test]
        fn test_index_roundtrip(
            leaves in proptest::collection::btree_map(
                proptest::collection::vec(segment(), 1..4),
                (proptest::option::of(1i64..500), proptest::option::of(1i64..120), 0.0f64..2e9),
                0..24,
            )
        ) {
            let mut index = ProvenanceIndex::new();
            for (segments, (line, column, ts)) in &leaves {
                let entry = ProvenanceEntry::at("/conf/a.yml", *line, *column).with_timestamp(*ts);
                index.insert(segments.join("."), entry);
            }
            // Only collision-free paths survive export; import must keep exactly those
            let exported = index.export_tree();
            let restored = ProvenanceIndex::from_value(&exported.to_value());

            prop_assert_eq!(restored.len(), exported.leaf_count());
            for (path, entry) in restored.iter() {
                prop_assert_eq!(Some(entry), index.lookup(path));
            }
        }

        /// Property: recording N distinct paths yields a count of N
        #[test]
        fn test_count_matches_distinct_paths(
            paths in proptest::collection::vec("[a-z.]{0,10}", 0..40)
        ) {
            let mut index = ProvenanceIndex::new();
            for path in &paths {
                index.record(path.as_str(), "/a.yml", None, None);
            }
            let distinct: std::collections::HashSet<_> = paths.iter().collect();
            prop_assert_eq!(index.len(), distinct.len());
        }
    }
}
