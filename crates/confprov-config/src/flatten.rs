//! Flattening parsed mappings into dotted-path provenance recordings

use crate::locate::KeyPositions;
use confprov_domain::tree::join_path;
use confprov_domain::ProvenanceSink;
use serde_yaml::{Mapping, Value};

/// Record every leaf of `data` into `sink`, attributed to `source_file`.
///
/// Mappings are descended into; sequences and scalars are leaves, so a
/// list-valued parameter is recorded once at its own path. Empty mappings
/// record nothing. Returns the number of leaves recorded.
pub fn flatten_into(
    sink: &mut dyn ProvenanceSink,
    data: &Mapping,
    source_file: &str,
    positions: &KeyPositions,
) -> usize {
    let mut recorded = 0;
    walk(sink, data, "", source_file, positions, &mut recorded);
    recorded
}

fn walk(
    sink: &mut dyn ProvenanceSink,
    map: &Mapping,
    prefix: &str,
    source_file: &str,
    positions: &KeyPositions,
    recorded: &mut usize,
) {
    for (key, value) in map {
        let Some(segment) = key_segment(key) else {
            continue;
        };
        let path = join_path(prefix, &segment);
        match value {
            Value::Mapping(child) => walk(sink, child, &path, source_file, positions, recorded),
            _ => {
                let (line, column) = positions.get(&path).unzip();
                sink.record(&path, source_file, line, column);
                *recorded += 1;
            }
        }
    }
}

/// Path segment for a mapping key; non-scalar keys have none
pub fn key_segment(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

/// Dotted paths of every leaf, in document order
pub fn leaf_paths(data: &Mapping) -> Vec<String> {
    struct Collect(Vec<String>);

    impl ProvenanceSink for Collect {
        fn record(&mut self, path: &str, _: &str, _: Option<i64>, _: Option<i64>) {
            self.0.push(path.to_string());
        }

        fn lookup(&self, _: &str) -> Option<&confprov_domain::ProvenanceEntry> {
            None
        }
    }

    let mut collect = Collect(Vec::new());
    flatten_into(&mut collect, data, "", &KeyPositions::new());
    collect.0
}
