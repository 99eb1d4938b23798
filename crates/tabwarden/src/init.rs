//! Init command - write a default .tabwarden.toml

use anyhow::Result;
use camino::Utf8PathBuf;
use std::fs;
use tabwarden_core::CONFIG_FILE_NAME;

use crate::cli::InitArgs;

/// Default .tabwarden.toml template with sensible settings
const DEFAULT_CONFIG: &str = include_str!("../templates/default.tabwarden.toml");

/// Run the init command to create a .tabwarden.toml file.
///
/// # Errors
///
/// Returns an error if:
/// - The target path is not a valid UTF-8 path
/// - The target directory does not exist
/// - The target path is not a directory
/// - The config file already exists and `--force` is not set
/// - Writing the config file fails
pub fn run_init(args: InitArgs) -> Result<()> {
    let target_dir = if args.path.is_absolute() {
        args.path
    } else {
        let cwd = std::env::current_dir()?;
        Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| anyhow::anyhow!("non-utf8 path"))?
            .join(&args.path)
    };

    if !target_dir.exists() {
        return Err(anyhow::anyhow!(
            "Target directory does not exist: {target_dir}"
        ));
    }

    if !target_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Target path is not a directory: {target_dir}"
        ));
    }

    let config_path = target_dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "{CONFIG_FILE_NAME} already exists at {config_path}\nUse --force to overwrite"
        ));
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    tracing::info!("Wrote default config to {config_path}");
    println!("✓ Created {CONFIG_FILE_NAME} at {config_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use tabwarden_core::WardenConfig;

    #[test]
    fn test_default_config_is_valid() {
        let config = WardenConfig::parse(DEFAULT_CONFIG);
        assert!(
            config.is_ok(),
            "Default config must validate: {:?}",
            config.err()
        );
    }

    #[test]
    fn test_default_config_enables_tab_checks() {
        let options = WardenConfig::parse(DEFAULT_CONFIG).unwrap().options.resolve();
        assert!(options.use_flake8_tabs);
        assert!(!options.use_pycodestyle_indent);
        assert_eq!(options.indent_style.as_str(), "tab");
    }

    #[test]
    fn test_default_config_leaves_format_unset() {
        let cfg: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(cfg.format.is_none());
    }
}
