use serde::Serialize;
use tracing::debug;

use super::path::{self, KeyPath};
use super::tagged::{self, Tagged, ToTagged};
use super::value::{Mapping, Value};
use super::ConfigError;

/// A named provider of configuration values.
///
/// Sources are built once and never mutated, so `resolve` is a pure function
/// of the path.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Returns the value at `path`, or `None` if this source has no opinion.
    fn resolve(&self, path: &KeyPath) -> Option<Value>;
}

/// A source backed by a generic value tree.
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    tree: Value,
}

impl MapSource {
    pub fn new(name: impl Into<String>, tree: Mapping) -> Self {
        Self::from_value(name, Value::Mapping(tree))
    }

    pub fn from_value(name: impl Into<String>, tree: Value) -> Self {
        let source = Self {
            name: name.into(),
            tree,
        };
        debug!(event = "config.source.created", kind = "map", source = %source.name);
        source
    }

    /// Builds a source from any serializable value.
    ///
    /// Struct fields are named as serde names them, so `#[serde(rename)]`
    /// acts as the serialization alias.
    pub fn from_serialize<T: Serialize>(
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, ConfigError> {
        let json = serde_json::to_value(value).map_err(ConfigError::SerializeError)?;
        Ok(Self::from_value(name, Value::from(json)))
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, path: &KeyPath) -> Option<Value> {
        path::lookup(&self.tree, path).cloned()
    }
}

/// A source backed by a struct-like tree of compiled-in defaults.
#[derive(Debug, Clone)]
pub struct DefaultsSource {
    name: String,
    tree: Tagged,
}

impl DefaultsSource {
    pub fn new(name: impl Into<String>, tree: Tagged) -> Self {
        let source = Self {
            name: name.into(),
            tree,
        };
        debug!(event = "config.source.created", kind = "defaults", source = %source.name);
        source
    }

    pub fn from_tagged<T: ToTagged + ?Sized>(name: impl Into<String>, value: &T) -> Self {
        Self::new(name, value.to_tagged())
    }
}

impl ConfigSource for DefaultsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, path: &KeyPath) -> Option<Value> {
        tagged::lookup(&self.tree, path).map(Tagged::to_value)
    }
}
