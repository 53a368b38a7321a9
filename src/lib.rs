pub mod cli;
pub mod config;
mod error;

pub use config::{
    ConfigError, ConfigSource, DefaultsSource, Discovery, FileSource, KeyPath, MapSource, Mapping,
    ResolverChain, Tagged, TaggedField, ToTagged, Value,
};
pub use error::Error;
