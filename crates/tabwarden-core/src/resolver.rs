//! Per-file option resolution: CLI flags, then the option source, then defaults.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::overrides::{Override, OverrideBuilder};
use std::collections::HashMap;
use tabwarden_abi::CheckOptions;

use crate::config::{ConfigError, OptionTable, WardenConfig};

/// Key/value lookup service answering "which options are set for this path".
pub trait OptionSource {
    fn lookup(&self, path: &Utf8Path) -> OptionTable;
}

/// A fixed table applies to every path.
impl OptionSource for OptionTable {
    fn lookup(&self, _path: &Utf8Path) -> OptionTable {
        self.clone()
    }
}

/// Option source backed by a loaded `.tabwarden.toml`.
pub struct ConfigSource {
    base: OptionTable,
    overrides: Vec<(Override, OptionTable)>,
}

impl ConfigSource {
    /// Compile the override globs of `config` relative to `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Glob` if an override glob is malformed.
    pub fn new(config: WardenConfig, root: &Utf8Path) -> Result<Self, ConfigError> {
        let mut overrides = Vec::with_capacity(config.overrides.len());
        for entry in config.overrides {
            let mut builder = OverrideBuilder::new(root);
            for glob in &entry.paths {
                builder
                    .add(glob)
                    .map_err(|e| ConfigError::Glob(format!("{glob}: {e}")))?;
            }
            let matcher = builder
                .build()
                .map_err(|e| ConfigError::Glob(e.to_string()))?;
            overrides.push((matcher, entry.options));
        }
        Ok(Self {
            base: config.options,
            overrides,
        })
    }
}

impl OptionSource for ConfigSource {
    fn lookup(&self, path: &Utf8Path) -> OptionTable {
        self.overrides
            .iter()
            .filter(|(matcher, _)| matcher.matched(path.as_std_path(), false).is_whitelist())
            .fold(self.base.clone(), |table, (_, options)| {
                options.clone().or(table)
            })
    }
}

/// Resolves and memoizes [`CheckOptions`] per file path.
pub struct OptionResolver {
    flags: OptionTable,
    source: Box<dyn OptionSource>,
    cache: HashMap<Utf8PathBuf, CheckOptions>,
}

impl Default for OptionResolver {
    fn default() -> Self {
        Self::new(OptionTable::default(), OptionTable::default())
    }
}

impl OptionResolver {
    #[must_use]
    pub fn new(flags: OptionTable, source: impl OptionSource + 'static) -> Self {
        Self {
            flags,
            source: Box::new(source),
            cache: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, path: &Utf8Path) -> CheckOptions {
        if let Some(options) = self.cache.get(path) {
            return *options;
        }
        let options = self
            .flags
            .clone()
            .or(self.source.lookup(path))
            .resolve();
        tracing::debug!("Resolved options for {path}: {options:?}");
        self.cache.insert(path.to_owned(), options);
        options
    }
}
