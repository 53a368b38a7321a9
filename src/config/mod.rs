//! Layered configuration sources and flag resolution.

mod builder;
mod chain;
mod error;
mod file;
mod path;
mod source;
mod tagged;
mod value;

pub use builder::Discovery;
pub use chain::{adapt, ResolverChain};
pub use error::ConfigError;
pub use file::FileSource;
pub use path::{lookup, KeyPath};
pub use source::{ConfigSource, DefaultsSource, MapSource};
pub use tagged::{lookup as lookup_tagged, Tagged, TaggedField, ToTagged};
pub use value::{Mapping, Value};
