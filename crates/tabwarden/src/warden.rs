//! Warden initialization: option resolution and check loading

use anyhow::Result;
use camino::Utf8PathBuf;
use tabwarden_core::{ConfigSource, OptionResolver, OptionTable, Warden};
use tabwarden_python::init_check as init_python_check;

use crate::cli::OptionFlags;
use crate::config::{config_root, load_warden_config};

/// Resolver for CLI flags layered over the config file (if any).
pub fn init_resolver(flags: OptionFlags, config_path: Option<&Utf8PathBuf>) -> Result<OptionResolver> {
    let flags = flags.into_table().validated()?;
    let resolver = match load_warden_config(config_path)? {
        Some(config) => {
            let root = config_root(config_path);
            OptionResolver::new(flags, ConfigSource::new(config, &root)?)
        }
        None => OptionResolver::new(flags, OptionTable::default()),
    };
    Ok(resolver)
}

/// Warden with every built-in check loaded.
pub fn init_warden(flags: OptionFlags, config_path: Option<&Utf8PathBuf>) -> Result<Warden> {
    let resolver = init_resolver(flags, config_path)?;
    Ok(Warden::new(resolver).with_check(init_python_check()))
}
