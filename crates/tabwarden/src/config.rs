//! Configuration file loading for the CLI

use crate::cli::OutputFormat;
use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use tabwarden_core::{CONFIG_FILE_NAME, WardenConfig};

/// CLI-level keys of `.tabwarden.toml`. Option tables are read by the core.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    pub format: Option<OutputFormat>,
}

fn config_path(path: Option<&Utf8PathBuf>) -> Utf8PathBuf {
    path.cloned()
        .unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME))
}

pub fn load_config(path: Option<&Utf8PathBuf>) -> Result<ConfigFile> {
    let config_path = config_path(path);

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        Ok(toml::from_str(&content)?)
    } else {
        Ok(ConfigFile::default())
    }
}

/// Load and validate the option tables. An explicit `--config` must exist.
pub fn load_warden_config(path: Option<&Utf8PathBuf>) -> Result<Option<WardenConfig>> {
    let config = match path {
        Some(p) => Some(WardenConfig::from_file(p.as_std_path())?),
        None => WardenConfig::load_default_strict()?,
    };
    Ok(config)
}

/// Directory that override globs are relative to.
#[must_use]
pub fn config_root(path: Option<&Utf8PathBuf>) -> Utf8PathBuf {
    let config_path = config_path(path);
    match config_path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
        _ => Utf8Path::new(".").to_owned(),
    }
}
