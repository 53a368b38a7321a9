use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config file '{0}' must contain a mapping at the top level")]
    NotAMapping(PathBuf),

    #[error("unsupported mapping key in '{path}': {key}")]
    UnsupportedKey { path: PathBuf, key: String },

    #[error("failed to convert value into a config tree: {0}")]
    SerializeError(#[source] serde_json::Error),

    #[error("could not serialize value for '{key}': {source}")]
    AdaptError {
        key: String,
        source: serde_json::Error,
    },

    #[error("could not render config as YAML: {0}")]
    DumpError(#[from] serde_yaml::Error),
}
