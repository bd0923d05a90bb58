//! Key position scanning for block-style YAML
//!
//! `serde_yaml` hands back plain values without source marks, so key
//! positions are recovered from the text by following indentation. Only
//! block mapping keys outside sequences are located; keys inside flow
//! collections, sequence items and block scalar bodies are not.

use crate::flatten::key_segment;
use confprov_domain::tree::join_path;
use std::collections::HashMap;

/// Dotted path → 1-indexed (line, column) of the key that set it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPositions {
    positions: HashMap<String, (i64, i64)>,
}

/// One open mapping level; `key` is `None` for a sequence item
#[derive(Debug)]
struct Frame {
    indent: usize,
    key: Option<String>,
}

impl KeyPositions {
    /// Create an empty position table
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan YAML source text for block mapping keys
    pub fn scan(text: &str) -> Self {
        let mut positions = HashMap::new();
        let mut stack: Vec<Frame> = Vec::new();
        // Indent of the key that opened a `|` or `>` block scalar
        let mut block_scalar: Option<usize> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            let content = line.trim_start_matches(' ');
            let indent = line.len() - content.len();

            if let Some(owner) = block_scalar {
                if content.is_empty() || indent > owner {
                    continue;
                }
                block_scalar = None;
            }

            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            if indent == 0 && (content.starts_with("---") || content.starts_with("...")) {
                stack.clear();
                continue;
            }

            while stack.last().is_some_and(|frame| frame.indent >= indent) {
                stack.pop();
            }

            if content == "-" || content.starts_with("- ") {
                stack.push(Frame { indent, key: None });
                continue;
            }

            let Some((key, rest)) = split_key(content) else {
                continue;
            };

            if stack.iter().all(|frame| frame.key.is_some()) {
                let path = stack
                    .iter()
                    .filter_map(|frame| frame.key.as_deref())
                    .fold(String::new(), |acc, segment| join_path(&acc, segment));
                let path = join_path(&path, &key);
                positions.insert(path, (idx as i64 + 1, indent as i64 + 1));
            }

            let value = rest.trim_start();
            if value.starts_with('|') || value.starts_with('>') {
                block_scalar = Some(indent);
            }
            stack.push(Frame { indent, key: Some(key) });
        }

        Self { positions }
    }

    /// Position of the key for `path`
    pub fn get(&self, path: &str) -> Option<(i64, i64)> {
        self.positions.get(path).copied()
    }

    /// Number of located keys
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no key was located
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Split `key: rest` into the unquoted key and the remainder after the colon
fn split_key(content: &str) -> Option<(String, &str)> {
    let first = content.chars().next()?;
    match first {
        '"' | '\'' => {
            let close = closing_quote(content, first)?;
            let key = unescape(&content[1..close], first);
            let after = content[close + 1..].trim_start();
            let rest = after.strip_prefix(':')?;
            if rest.is_empty() || rest.starts_with(' ') {
                Some((key, rest))
            } else {
                None
            }
        }
        '{' | '[' | '&' | '*' | '!' | '?' | '|' | '>' | '%' | '@' | '`' => None,
        _ => {
            let colon = find_mapping_colon(content)?;
            let key = content[..colon].trim_end();
            if key.is_empty() || key.contains(" #") {
                return None;
            }
            Some((plain_key(key), &content[colon + 1..]))
        }
    }
}

/// Render a plain key the way the parsed mapping key is rendered, so
/// `True` and `~` locate as `true` and `null`
fn plain_key(key: &str) -> String {
    serde_yaml::from_str::<serde_yaml::Value>(key)
        .ok()
        .and_then(|value| key_segment(&value))
        .unwrap_or_else(|| key.to_string())
}

/// Byte offset of the first `:` followed by a space or end of line
fn find_mapping_colon(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    bytes.iter().enumerate().find_map(|(i, b)| {
        let ends_key = *b == b':' && bytes.get(i + 1).is_none_or(|next| *next == b' ');
        ends_key.then_some(i)
    })
}

/// Byte offset of the quote closing a key that opens at offset 0
fn closing_quote(content: &str, quote: char) -> Option<usize> {
    let bytes = content.as_bytes();
    let quote = quote as u8;
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == b'"' => i += 2,
            b if b == quote => {
                // '' is an escaped quote inside single-quoted scalars
                if quote == b'\'' && bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                } else {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}

fn unescape(inner: &str, quote: char) -> String {
    match quote {
        '\'' => inner.replace("''", "'"),
        _ => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
    }
}
