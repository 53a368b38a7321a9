use std::path::{Path, PathBuf};

use tracing::debug;

use super::chain::ResolverChain;
use super::file::FileSource;
use super::source::DefaultsSource;
use super::tagged::{Tagged, ToTagged};
use super::ConfigError;

/// Builder that assembles a [`ResolverChain`] from config files and
/// compiled-in defaults.
///
/// The resulting precedence, highest first:
///
/// 1. files added with [`with_file`](Self::with_file), the most recently added first
/// 2. discovered files that exist, in search order
/// 3. struct defaults
///
/// Command-line values sit above all of these; the flag parser applies them
/// after resolution.
///
/// ## Example
///
/// ```no_run
/// use flagchain::{Discovery, Tagged, TaggedField};
///
/// let chain = Discovery::new("myapp")
///     .with_file("override.yaml", true)
///     .with_default_tree(Tagged::record([TaggedField::leaf("port", 8080)]))
///     .build()?;
/// # Ok::<(), flagchain::ConfigError>(())
/// ```
///
/// With the default search paths this probes, in order,
/// `./myapp.config.yaml`, `/opt/myapp/etc/myapp.config.yaml` and
/// `/etc/myapp.config.yaml`.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Discovery {
    explicit: Vec<(PathBuf, bool)>,
    search_paths: Vec<PathBuf>,
    defaults: Option<Tagged>,
}

impl Discovery {
    /// Creates a builder with the default search paths for `app_name`.
    pub fn new(app_name: &str) -> Self {
        Self {
            explicit: Vec::new(),
            search_paths: default_search_paths(app_name),
            defaults: None,
        }
    }

    /// Adds an explicit config file.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Later calls take precedence over earlier ones.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.explicit.push((path.as_ref().to_path_buf(), required));
        self
    }

    /// Replaces the probed locations. Earlier paths take precedence.
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.search_paths = paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        self
    }

    /// Sets the struct whose fields provide the lowest-precedence values.
    pub fn with_defaults<T: ToTagged + ?Sized>(self, defaults: &T) -> Self {
        self.with_default_tree(defaults.to_tagged())
    }

    pub fn with_default_tree(mut self, tree: Tagged) -> Self {
        self.defaults = Some(tree);
        self
    }

    /// Loads every file and builds the chain.
    ///
    /// A discovered file that exists but cannot be read or parsed fails the
    /// whole build, as does a missing required file.
    pub fn build(self) -> Result<ResolverChain, ConfigError> {
        let mut chain = ResolverChain::new();

        for (path, required) in self.explicit.iter().rev() {
            if let Some(source) = FileSource::open(path, *required)? {
                chain.push(source);
            }
        }

        for path in collect_config_files(&self.search_paths) {
            chain.push(FileSource::load(path)?);
        }

        if let Some(tree) = self.defaults {
            chain.push(DefaultsSource::new("defaults", tree));
        }

        debug!(event = "config.discovery.built", sources = chain.len());
        Ok(chain)
    }
}

fn default_search_paths(app_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{app_name}.config.yaml");
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(&file_name));
    }
    paths.push(PathBuf::from(format!("/opt/{app_name}/etc")).join(&file_name));
    paths.push(PathBuf::from("/etc").join(&file_name));
    paths
}

/// Returns the candidates that exist, preserving order.
fn collect_config_files(candidates: &[PathBuf]) -> Vec<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| p.exists())
        .collect()
}
