//! Dotted key paths and lookup over generic value trees.

use std::fmt;

use super::value::Value;

/// A dot-delimited address into a nested tree.
///
/// Segments are split on `.` with no escaping, so a key that itself contains
/// a dot cannot be addressed. The empty string is the root path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Splits `path` on `.`.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The path with zero segments.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Looks up `path` in a generic tree.
///
/// Returns `None` as soon as a segment meets a null, a non-mapping or a
/// missing key. The value at the end of the path is returned as-is, even
/// when it is itself a sequence or mapping.
pub fn lookup<'a>(tree: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    let mut current = tree;

    for segment in path.segments() {
        current = match current {
            Value::Mapping(map) => map.get(segment)?,
            _ => return None,
        };
    }

    Some(current)
}
