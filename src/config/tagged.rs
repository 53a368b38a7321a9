//! Struct-like trees whose fields carry serialization and flag aliases.
//!
//! Rust has no runtime reflection, so a type that wants to act as a source
//! of defaults describes its fields through [`ToTagged`]:
//!
//! ```
//! use flagchain::{Tagged, TaggedField, ToTagged};
//!
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl ToTagged for Server {
//!     fn to_tagged(&self) -> Tagged {
//!         Tagged::record([
//!             TaggedField::leaf("Host", self.host.as_str()).serde("host"),
//!             TaggedField::leaf("Port", self.port).flag("port"),
//!         ])
//!     }
//! }
//! ```

use super::path::KeyPath;
use super::value::{Mapping, Value};

/// A node in a struct-like tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tagged {
    /// A field value that is not itself a record. Lookup never descends into it.
    Leaf(Value),
    /// A set of named fields.
    Record(Vec<TaggedField>),
}

impl Tagged {
    pub fn record(fields: impl IntoIterator<Item = TaggedField>) -> Self {
        Tagged::Record(fields.into_iter().collect())
    }

    /// Flattens the node into a plain value, keying record fields by their
    /// external names.
    pub fn to_value(&self) -> Value {
        match self {
            Tagged::Leaf(value) => value.clone(),
            Tagged::Record(fields) => Value::Mapping(
                fields
                    .iter()
                    .map(|f| (f.external_name().to_string(), f.value.to_value()))
                    .collect::<Mapping>(),
            ),
        }
    }
}

impl From<Value> for Tagged {
    fn from(value: Value) -> Self {
        Tagged::Leaf(value)
    }
}

/// A named field with optional aliases.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedField {
    pub name: String,
    /// Serialization alias, possibly followed by `,`-separated modifiers
    /// (`"foo,omitempty"`).
    pub serde_alias: Option<String>,
    /// Command-line flag alias.
    pub flag_alias: Option<String>,
    pub value: Tagged,
}

impl TaggedField {
    pub fn new(name: impl Into<String>, value: Tagged) -> Self {
        Self {
            name: name.into(),
            serde_alias: None,
            flag_alias: None,
            value,
        }
    }

    pub fn leaf(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(name, Tagged::Leaf(value.into()))
    }

    pub fn record(name: impl Into<String>, fields: impl IntoIterator<Item = TaggedField>) -> Self {
        Self::new(name, Tagged::record(fields))
    }

    #[must_use]
    pub fn serde(mut self, alias: impl Into<String>) -> Self {
        self.serde_alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, alias: impl Into<String>) -> Self {
        self.flag_alias = Some(alias.into());
        self
    }

    /// The name this field is resolved by.
    ///
    /// The serialization alias wins (only the part before the first `,`),
    /// then the flag alias, then the declared name. Empty aliases count as
    /// absent. Matching is exact and case-sensitive.
    pub fn external_name(&self) -> &str {
        if let Some(alias) = self.serde_alias.as_deref().filter(|a| !a.is_empty()) {
            return alias.split(',').next().unwrap_or(alias);
        }
        if let Some(alias) = self.flag_alias.as_deref().filter(|a| !a.is_empty()) {
            return alias;
        }
        &self.name
    }
}

/// Types that can describe themselves as a [`Tagged`] tree.
pub trait ToTagged {
    fn to_tagged(&self) -> Tagged;
}

impl ToTagged for Tagged {
    fn to_tagged(&self) -> Tagged {
        self.clone()
    }
}

/// Looks up `path` in a tagged tree.
///
/// Each segment must name a field of the current record. Reaching a leaf
/// before the path is exhausted yields `None`.
pub fn lookup<'a>(tree: &'a Tagged, path: &KeyPath) -> Option<&'a Tagged> {
    let mut current = tree;

    for segment in path.segments() {
        let Tagged::Record(fields) = current else {
            return None;
        };
        current = &fields.iter().find(|f| f.external_name() == segment)?.value;
    }

    Some(current)
}
