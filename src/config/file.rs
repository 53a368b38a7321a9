//! File-based configuration source.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::path::KeyPath;
use super::source::{ConfigSource, MapSource};
use super::value::{Mapping, Value};
use super::ConfigError;

/// A configuration source loaded from a YAML file, or TOML when the file
/// name ends in `.toml`.
///
/// The file is read and decoded once, at construction. Any read or decode
/// failure is returned to the caller; no partial source is created.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    inner: MapSource,
}

impl FileSource {
    /// Loads a file that must exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        Self::open(path, true)?.ok_or_else(|| ConfigError::FileNotFound(path.to_path_buf()))
    }

    /// Loads a file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist and `required` is false.
    pub fn open(path: impl AsRef<Path>, required: bool) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        let Some(tree) = load_config_file(path, required)? else {
            return Ok(None);
        };

        debug!(event = "config.file.loaded", path = %path.display());
        Ok(Some(Self {
            path: path.to_path_buf(),
            inner: MapSource::new(path.display().to_string(), tree),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn resolve(&self, path: &KeyPath) -> Option<Value> {
        self.inner.resolve(path)
    }
}

/// Loads and parses a config file into a mapping.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<Mapping>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_document(path, &contents).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn parse_document(path: &Path, contents: &str) -> Result<Mapping, ConfigError> {
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");

    let value = if is_toml {
        let table: toml::Table =
            toml::from_str(contents).map_err(|e| ConfigError::TomlParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Value::from(toml::Value::Table(table))
    } else {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
        Value::from_yaml(yaml).map_err(|key| ConfigError::UnsupportedKey {
            path: path.to_path_buf(),
            key,
        })?
    };

    match value {
        Value::Mapping(map) => Ok(map),
        // An empty document
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_file_source_loads_valid_file() {
        let file = yaml_file("foo: bar");

        let source = FileSource::load(file.path()).unwrap();

        assert_eq!(source.path(), file.path());
        assert_eq!(source.resolve(&"foo".into()), Some(Value::from("bar")));
        assert_eq!(source.resolve(&"hoge".into()), None);
    }

    #[test]
    fn test_file_source_nested_and_lists() {
        let file = yaml_file(
            "group1:\n  key: value\ngroup2:\n  - entry: value1\n  - entry: value2\n",
        );

        let source = FileSource::load(file.path()).unwrap();

        assert_eq!(source.resolve(&"group1.key".into()), Some(Value::from("value")));
        let Some(Value::Sequence(entries)) = source.resolve(&"group2".into()) else {
            panic!("group2 should be a sequence");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_file_source_required_missing() {
        let result = FileSource::load("/nonexistent/path/config.yaml");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_file_source_optional_missing() {
        let source = FileSource::open("/nonexistent/path/config.yaml", false).unwrap();

        assert!(source.is_none());
    }

    #[test]
    fn test_file_source_rejects_scalar_document() {
        let file = yaml_file("INVALID");

        let result = FileSource::load(file.path());

        assert!(matches!(result, Err(ConfigError::NotAMapping(_))));
    }

    #[test]
    fn test_file_source_rejects_malformed_yaml() {
        let file = yaml_file("key: [unclosed");

        let err = FileSource::load(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_file_source_empty_document() {
        let file = yaml_file("");

        let source = FileSource::load(file.path()).unwrap();

        assert_eq!(source.resolve(&"anything".into()), None);
    }

    #[test]
    fn test_file_source_toml() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 8080").unwrap();

        let source = FileSource::load(file.path()).unwrap();

        assert_eq!(source.resolve(&"server.port".into()), Some(Value::Integer(8080)));
    }
}
