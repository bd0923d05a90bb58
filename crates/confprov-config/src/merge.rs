//! Layered merge of configuration files

use crate::flatten::flatten_into;
use crate::yaml::LoadedYaml;
use confprov_domain::{ProvenanceSink, PATH_SEPARATOR};
use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base`.
///
/// Mappings present on both sides merge key by key; any other overlay value
/// replaces what `base` held.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(incoming) => match base.get_mut(&key) {
                Some(Value::Mapping(existing)) => deep_merge(existing, incoming),
                _ => {
                    base.insert(key, Value::Mapping(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Merge one loaded file into `current`, recording its leaves in `sink`.
///
/// Returns the number of leaves recorded.
pub fn merge_document(current: &mut Mapping, doc: &LoadedYaml, sink: &mut dyn ProvenanceSink) -> usize {
    let recorded = flatten_into(sink, &doc.data, &doc.source_file(), &doc.positions);
    deep_merge(current, doc.data.clone());
    recorded
}

/// Look up a dotted path in merged data
pub fn get_path<'a>(data: &'a Mapping, path: &str) -> Option<&'a Value> {
    let mut segments = path.split(PATH_SEPARATOR);
    let first = data.get(segments.next()?)?;
    segments.try_fold(first, |node, segment| node.get(segment))
}
