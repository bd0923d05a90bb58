//! Nested provenance trees
//!
//! The flat index projects onto a tree shaped like the configuration:
//! `"JOBS.SIM.WALLCLOCK"` becomes `{JOBS: {SIM: {WALLCLOCK: <entry>}}}`.
//! In memory the tree is an explicit `Leaf | Node` union. The persisted
//! form has no tag: a mapping holding a `file` key is a leaf.

use crate::provenance::{ProvenanceEntry, FILE_KEY};
use crate::PATH_SEPARATOR;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// A node of the nested provenance projection
#[derive(Debug, Clone, PartialEq)]
pub enum ProvenanceTree {
    /// Provenance of one parameter
    Leaf(ProvenanceEntry),

    /// Internal node keyed by path segment
    Node(BTreeMap<String, ProvenanceTree>),
}

impl Default for ProvenanceTree {
    fn default() -> Self {
        ProvenanceTree::Node(BTreeMap::new())
    }
}

impl ProvenanceTree {
    /// Create an empty internal node
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, ProvenanceTree::Leaf(_))
    }

    /// Whether this is an internal node without children
    pub fn is_empty(&self) -> bool {
        matches!(self, ProvenanceTree::Node(children) if children.is_empty())
    }

    /// The entry held by a leaf
    pub fn entry(&self) -> Option<&ProvenanceEntry> {
        match self {
            ProvenanceTree::Leaf(entry) => Some(entry),
            ProvenanceTree::Node(_) => None,
        }
    }

    /// Direct child of an internal node
    pub fn child(&self, segment: &str) -> Option<&ProvenanceTree> {
        match self {
            ProvenanceTree::Node(children) => children.get(segment),
            ProvenanceTree::Leaf(_) => None,
        }
    }

    /// Descend along a dotted path
    pub fn find(&self, path: &str) -> Option<&ProvenanceTree> {
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// Number of leaves below this node
    pub fn leaf_count(&self) -> usize {
        match self {
            ProvenanceTree::Leaf(_) => 1,
            ProvenanceTree::Node(children) => children.values().map(Self::leaf_count).sum(),
        }
    }

    /// Place `entry` at the position named by `segments`.
    ///
    /// Missing intermediate nodes are created. If an intermediate position
    /// already holds a leaf the insertion is abandoned and `false` is
    /// returned; nothing is overwritten in that case. The final segment
    /// always receives the new leaf.
    pub fn insert(&mut self, segments: &[&str], entry: ProvenanceEntry) -> bool {
        let Some((last, parents)) = segments.split_last() else {
            return false;
        };
        let mut current = match self {
            ProvenanceTree::Node(children) => children,
            ProvenanceTree::Leaf(_) => return false,
        };
        for segment in parents {
            let child = current
                .entry((*segment).to_string())
                .or_insert_with(ProvenanceTree::new);
            current = match child {
                ProvenanceTree::Node(children) => children,
                ProvenanceTree::Leaf(_) => return false,
            };
        }
        current.insert((*last).to_string(), ProvenanceTree::Leaf(entry));
        true
    }

    /// Visit every leaf with its accumulated dotted path.
    ///
    /// A segment is appended to a non-empty prefix with a separator and
    /// replaces an empty one.
    pub fn for_each_leaf<F>(&self, prefix: &str, visit: &mut F)
    where
        F: FnMut(String, &ProvenanceEntry),
    {
        match self {
            ProvenanceTree::Leaf(entry) => visit(prefix.to_string(), entry),
            ProvenanceTree::Node(children) => {
                for (segment, child) in children {
                    child.for_each_leaf(&join_path(prefix, segment), visit);
                }
            }
        }
    }

    /// Render the persisted (untagged) form
    pub fn to_value(&self) -> Value {
        match self {
            ProvenanceTree::Leaf(entry) => entry.to_value(),
            ProvenanceTree::Node(children) => Value::Object(
                children
                    .iter()
                    .map(|(segment, child)| (segment.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    /// Parse the persisted form, keeping whatever can be salvaged.
    ///
    /// The root is always an internal node. Children that look like
    /// serialized entries become leaves, other mappings become internal
    /// nodes, and anything else is dropped. A leaf that cannot be decoded is
    /// skipped with a warning. A non-mapping root yields an empty tree.
    pub fn from_value(value: &Value) -> Self {
        match value.as_object() {
            Some(map) => Self::node_from_map(map, ""),
            None => Self::new(),
        }
    }

    fn node_from_map(map: &Map<String, Value>, path: &str) -> Self {
        let mut children = BTreeMap::new();
        for (segment, child) in map {
            let Some(child_map) = child.as_object() else {
                continue;
            };
            let child_path = join_path(path, segment);
            let subtree = if looks_like_leaf(child_map) {
                match ProvenanceEntry::from_value(child) {
                    Ok(entry) => ProvenanceTree::Leaf(entry),
                    Err(e) => {
                        warn!("Skipping provenance for {}: {}", child_path, e);
                        continue;
                    }
                }
            } else {
                Self::node_from_map(child_map, &child_path)
            };
            children.insert(segment.clone(), subtree);
        }
        ProvenanceTree::Node(children)
    }
}

/// Whether a persisted mapping is a serialized entry rather than a node.
///
/// A serialized entry holds a `file` key whose value is not itself a
/// mapping. A configuration parameter literally named `file` exports as a
/// nested entry, so its parent stays an internal node.
pub fn looks_like_leaf(map: &Map<String, Value>) -> bool {
    map.get(FILE_KEY).is_some_and(|file| !file.is_object())
}

/// Append `segment` to a dotted `prefix`; an empty prefix is replaced
pub fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}{}{}", prefix, PATH_SEPARATOR, segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(file: &str) -> ProvenanceEntry {
        ProvenanceEntry::new(file).with_timestamp(100.0)
    }

    #[test]
    fn test_insert_creates_intermediate_nodes() {
        let mut tree = ProvenanceTree::new();
        assert!(tree.insert(&["JOBS", "SIM", "WALLCLOCK"], entry("/b.yml")));

        let leaf = tree.find("JOBS.SIM.WALLCLOCK").unwrap();
        assert_eq!(leaf.entry().unwrap().source_file, "/b.yml");
        assert!(!tree.find("JOBS.SIM").unwrap().is_leaf());
    }

    #[test]
    fn test_insert_skips_when_parent_is_leaf() {
        let mut tree = ProvenanceTree::new();
        assert!(tree.insert(&["A"], entry("/a.yml")));
        assert!(!tree.insert(&["A", "B"], entry("/b.yml")));

        assert_eq!(tree.find("A").unwrap().entry().unwrap().source_file, "/a.yml");
        assert!(tree.find("A.B").is_none());
    }

    #[test]
    fn test_insert_into_leaf_root_is_rejected() {
        let mut tree = ProvenanceTree::Leaf(entry("/a.yml"));
        assert!(!tree.insert(&["A"], entry("/b.yml")));
    }

    #[test]
    fn test_from_value_sniffs_leaves() {
        let value = json!({
            "DEFAULT": {
                "EXPID": {"file": "/a.yml", "line": 2, "timestamp": 1.5},
                "NOTE": "not a mapping",
            },
            "stray": 42,
        });

        let tree = ProvenanceTree::from_value(&value);
        assert_eq!(tree.leaf_count(), 1);
        assert!(tree.find("DEFAULT.NOTE").is_none());
        assert!(tree.child("stray").is_none());
        assert_eq!(tree.find("DEFAULT.EXPID").unwrap().entry().unwrap().line, Some(2));
    }

    #[test]
    fn test_root_is_never_a_leaf() {
        let tree = ProvenanceTree::from_value(&json!({"file": "/a.yml"}));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_non_mapping_root_is_empty() {
        assert!(ProvenanceTree::from_value(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_to_value_roundtrip() {
        let mut tree = ProvenanceTree::new();
        tree.insert(&["DEFAULT", "EXPID"], entry("/a.yml").with_line(2));
        tree.insert(&["PLATFORMS", "LOCAL", "TYPE"], entry("/p.yml"));

        let restored = ProvenanceTree::from_value(&tree.to_value());
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_leaves_carry_dotted_paths() {
        let mut tree = ProvenanceTree::new();
        tree.insert(&["B", "X"], entry("/b.yml"));
        tree.insert(&["A"], entry("/a.yml"));

        let mut paths = Vec::new();
        tree.for_each_leaf("", &mut |path, _| paths.push(path));
        assert_eq!(paths, vec!["A".to_string(), "B.X".to_string()]);
    }

    #[test]
    fn test_undecodable_leaf_is_skipped() {
        let tree = ProvenanceTree::from_value(&json!({
            "GOOD": {"X": {"file": "/a.yml", "line": 2}},
            "BAD": {"file": ["/b.yml"]},
            "ODD": {"file": "/c.yml", "line": "ten"},
        }));

        assert_eq!(tree.leaf_count(), 2);
        assert!(tree.child("BAD").is_none());
        assert_eq!(tree.find("GOOD.X").unwrap().entry().unwrap().line, Some(2));
        assert_eq!(tree.find("ODD").unwrap().entry().unwrap().line, None);
    }

    #[test]
    fn test_parameter_named_file_stays_nested() {
        let mut tree = ProvenanceTree::new();
        tree.insert(&["JOBS", "SIM", "file"], entry("/jobs.yml"));
        tree.insert(&["JOBS", "SIM", "WALLCLOCK"], entry("/jobs.yml").with_line(4));

        let restored = ProvenanceTree::from_value(&tree.to_value());
        assert_eq!(restored, tree);
        assert!(restored.find("JOBS.SIM.file").unwrap().is_leaf());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "A"), "A");
        assert_eq!(join_path("A", "B"), "A.B");
    }
}
