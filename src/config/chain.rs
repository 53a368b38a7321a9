//! Ordered resolution across sources.

use tracing::trace;

use super::path::KeyPath;
use super::source::ConfigSource;
use super::value::Value;
use super::ConfigError;

/// An ordered list of sources. Earlier sources take precedence.
///
/// The chain honors whatever order it is given; deciding that order is up to
/// the caller (see [`Discovery`](crate::Discovery)).
#[derive(Debug, Default)]
pub struct ResolverChain {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source with lower precedence than all current ones.
    pub fn push(&mut self, source: impl ConfigSource + 'static) {
        self.sources.push(Box::new(source));
    }

    /// Adds a source with higher precedence than all current ones.
    pub fn prepend(&mut self, source: impl ConfigSource + 'static) {
        self.sources.insert(0, Box::new(source));
    }

    #[must_use]
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name())
    }

    /// Resolves a flag by name.
    ///
    /// Returns the first present value in source order, adapted for a flag
    /// parser: sequences and mappings become JSON text. `Ok(None)` means no
    /// source has an opinion. An adaptation failure aborts resolution of this
    /// flag without consulting later sources.
    pub fn resolve(&self, flag: &str) -> Result<Option<Value>, ConfigError> {
        let path = KeyPath::parse(flag);

        for source in &self.sources {
            let Some(value) = source.resolve(&path) else {
                continue;
            };

            trace!(event = "config.chain.hit", flag, source = source.name());
            return adapt(flag, value).map(Some);
        }

        trace!(event = "config.chain.miss", flag);
        Ok(None)
    }
}

/// Converts sequences and mappings into compact JSON text; every other value
/// passes through unchanged.
pub fn adapt(key: &str, value: Value) -> Result<Value, ConfigError> {
    if !value.is_composite() {
        return Ok(value);
    }

    serde_json::to_string(&value)
        .map(Value::String)
        .map_err(|source| ConfigError::AdaptError {
            key: key.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::source::{DefaultsSource, MapSource};
    use crate::config::tagged::{Tagged, TaggedField};
    use crate::config::value::Mapping;

    fn map_source(name: &str, entries: &[(&str, Value)]) -> MapSource {
        let tree: Mapping = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        MapSource::new(name, tree)
    }

    #[test]
    fn test_first_source_wins() {
        let chain = ResolverChain::new()
            .with_source(map_source("a", &[("k", Value::from("from-a"))]))
            .with_source(map_source(
                "b",
                &[("k", Value::from("from-b")), ("only-b", Value::from(2))],
            ));

        assert_eq!(chain.resolve("k").unwrap(), Some(Value::from("from-a")));
        assert_eq!(chain.resolve("only-b").unwrap(), Some(Value::Integer(2)));
        assert_eq!(chain.resolve("neither").unwrap(), None);
    }

    #[test]
    fn test_prepend_takes_precedence() {
        let mut chain =
            ResolverChain::new().with_source(map_source("low", &[("k", Value::from("low"))]));
        chain.prepend(map_source("high", &[("k", Value::from("high"))]));

        assert_eq!(chain.source_names().collect::<Vec<_>>(), ["high", "low"]);
        assert_eq!(chain.resolve("k").unwrap(), Some(Value::from("high")));
    }

    #[test]
    fn test_repeated_resolution_is_stable() {
        let chain =
            ResolverChain::new().with_source(map_source("a", &[("k", Value::from(vec!["x"]))]));

        let first = chain.resolve("k").unwrap();
        let second = chain.resolve("k").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_sequences_become_json() {
        let chain = ResolverChain::new()
            .with_source(map_source("a", &[("abc", Value::from(vec!["a", "b", "c"]))]));

        assert_eq!(chain.resolve("abc").unwrap(), Some(Value::from(r#"["a","b","c"]"#)));
    }

    #[test]
    fn test_mappings_become_json() {
        let entry = Mapping::from([("entry".to_string(), Value::from("value1"))]);
        let chain = ResolverChain::new().with_source(map_source(
            "a",
            &[
                ("group2", Value::Sequence(vec![Value::Mapping(entry.clone())])),
                ("one", Value::Mapping(entry)),
            ],
        ));

        assert_eq!(
            chain.resolve("group2").unwrap(),
            Some(Value::from(r#"[{"entry":"value1"}]"#))
        );
        assert_eq!(
            chain.resolve("one").unwrap(),
            Some(Value::from(r#"{"entry":"value1"}"#))
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let chain = ResolverChain::new().with_source(map_source(
            "a",
            &[
                ("s", Value::from("plain")),
                ("n", Value::from(42)),
                ("b", Value::from(true)),
                ("z", Value::Null),
            ],
        ));

        assert_eq!(chain.resolve("s").unwrap(), Some(Value::from("plain")));
        assert_eq!(chain.resolve("n").unwrap(), Some(Value::Integer(42)));
        assert_eq!(chain.resolve("b").unwrap(), Some(Value::Bool(true)));
        assert_eq!(chain.resolve("z").unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_adapt_error_stops_chain() {
        let chain = ResolverChain::new()
            .with_source(map_source("broken", &[("k", Value::from(vec![f64::NAN]))]))
            .with_source(map_source("fine", &[("k", Value::from("ok"))]));

        let err = chain.resolve("k").unwrap_err();
        assert!(matches!(err, ConfigError::AdaptError { ref key, .. } if key == "k"));

        // Other flags are unaffected.
        assert_eq!(chain.resolve("missing").unwrap(), None);
    }

    #[test]
    fn test_struct_defaults_after_map() {
        let defaults = || {
            let key = TaggedField::leaf("Key", "default").serde("key");
            let group = TaggedField::record("Group1", [key]).serde("group1");
            DefaultsSource::new("defaults", Tagged::record([group]))
        };
        let group = Mapping::from([("key".to_string(), Value::from("config"))]);
        let file = map_source("file", &[("group1", Value::Mapping(group))]);

        let chain = ResolverChain::new().with_source(file).with_source(defaults());
        assert_eq!(chain.resolve("group1.key").unwrap(), Some(Value::from("config")));

        let defaults_only = ResolverChain::new().with_source(defaults());
        assert_eq!(
            defaults_only.resolve("group1.key").unwrap(),
            Some(Value::from("default"))
        );
    }
}
