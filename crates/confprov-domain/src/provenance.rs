//! Provenance entries: where a single configuration value came from

use crate::error::{ProvenanceError, Result};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Key marking a serialized leaf in a persisted provenance tree
pub const FILE_KEY: &str = "file";
/// Key holding the 1-indexed line number
pub const LINE_KEY: &str = "line";
/// Key holding the 1-indexed column number
pub const COLUMN_KEY: &str = "col";
/// Key holding the capture time in seconds since the Unix epoch
pub const TIMESTAMP_KEY: &str = "timestamp";

/// Current wall-clock time in fractional seconds since the Unix epoch
fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Origin of one configuration value.
///
/// Line and column are diagnostic metadata and are stored exactly as given,
/// including zero or negative values.
///
/// # Examples
///
/// ```
/// use confprov_domain::ProvenanceEntry;
///
/// let entry = ProvenanceEntry::new("/conf/jobs.yml").with_line(10).with_column(5);
/// assert_eq!(entry.to_string(), "/conf/jobs.yml:10:5");
///
/// let value = entry.to_value();
/// assert_eq!(value["file"], "/conf/jobs.yml");
/// assert!(value.get("timestamp").is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceEntry {
    /// Path of the YAML file the value was read from
    pub source_file: String,

    /// 1-indexed line of the key, when known
    pub line: Option<i64>,

    /// 1-indexed column of the key, when known
    pub column: Option<i64>,

    /// Seconds since the Unix epoch; absent only for entries read back
    /// from a tree that did not carry one
    pub captured_at: Option<f64>,
}

impl ProvenanceEntry {
    /// Create an entry for `source_file`, stamped with the current time
    pub fn new<P: AsRef<Path>>(source_file: P) -> Self {
        Self {
            source_file: source_file.as_ref().to_string_lossy().into_owned(),
            line: None,
            column: None,
            captured_at: Some(current_timestamp()),
        }
    }

    /// Create an entry with an optional position in one call
    pub fn at<P: AsRef<Path>>(source_file: P, line: Option<i64>, column: Option<i64>) -> Self {
        Self {
            line,
            column,
            ..Self::new(source_file)
        }
    }

    /// Set the line number
    pub fn with_line(mut self, line: i64) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the column number
    pub fn with_column(mut self, column: i64) -> Self {
        self.column = Some(column);
        self
    }

    /// Replace the capture time with an explicit one
    pub fn with_timestamp(mut self, captured_at: f64) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    /// Serialize to the persisted mapping form.
    ///
    /// `file` and `timestamp` are always present; `line` and `col` appear
    /// only when known, never as explicit nulls.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(FILE_KEY.to_string(), Value::String(self.source_file.clone()));
        if let Some(line) = self.line {
            map.insert(LINE_KEY.to_string(), Value::from(line));
        }
        if let Some(column) = self.column {
            map.insert(COLUMN_KEY.to_string(), Value::from(column));
        }
        let timestamp = self
            .captured_at
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        map.insert(TIMESTAMP_KEY.to_string(), timestamp);
        Value::Object(map)
    }

    /// Deserialize from the persisted mapping form.
    ///
    /// Only `file` is required. `line`, `col` and `timestamp` are read when
    /// they hold a number of the right kind and are absent otherwise. A
    /// numeric or boolean `file` is kept as its text.
    ///
    /// # Errors
    /// Returns [`ProvenanceError::NotAMapping`] for a non-mapping value and
    /// [`ProvenanceError::MissingKey`] when `file` is absent or is not a
    /// scalar.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| ProvenanceError::NotAMapping(json_kind(value)))?;
        let source_file = match map.get(FILE_KEY) {
            Some(Value::String(file)) => file.clone(),
            Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
            _ => return Err(ProvenanceError::MissingKey(FILE_KEY)),
        };
        Ok(Self {
            source_file,
            line: map.get(LINE_KEY).and_then(Value::as_i64),
            column: map.get(COLUMN_KEY).and_then(Value::as_i64),
            captured_at: map.get(TIMESTAMP_KEY).and_then(Value::as_f64),
        })
    }
}

impl fmt::Display for ProvenanceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source_file)?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(column) = self.column {
            write!(f, ":{}", column)?;
        }
        Ok(())
    }
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: serialize then deserialize reproduces every field
        #[test]
        fn test_entry_roundtrip(
            file in "/[a-z]{1,8}/[a-z_]{1,12}\\.ya?ml",
            line in proptest::option::of(any::<i64>()),
            column in proptest::option::of(any::<i64>()),
            captured_at in 0.0f64..4_102_444_800.0,
        ) {
            let entry = ProvenanceEntry::at(&file, line, column).with_timestamp(captured_at);
            let restored = ProvenanceEntry::from_value(&entry.to_value());

            match restored {
                Ok(restored) => prop_assert_eq!(restored, entry),
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }
    }
}
