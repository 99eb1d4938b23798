//! Options command - shows the options resolved for one path

use anyhow::Result;
use camino::Utf8PathBuf;
use tabwarden_core::CONFIG_FILE_NAME;

use crate::cli::OptionsArgs;
use crate::warden::init_resolver;

/// Resolved options for `args.path`, rendered as TOML.
pub fn render_options(args: &OptionsArgs) -> Result<String> {
    let mut resolver = init_resolver(args.options.clone(), args.config.as_ref())?;
    let options = resolver.resolve(&args.path);
    Ok(toml::to_string(&options)?)
}

pub fn run_options(args: &OptionsArgs) -> Result<()> {
    let rendered = render_options(args)?;

    let default_path = Utf8PathBuf::from(CONFIG_FILE_NAME);
    let config_display = args.config.as_ref().unwrap_or(&default_path);
    if config_display.exists() {
        println!("# config: {config_display}");
    } else {
        println!("# config: {config_display} (not found - using defaults)");
    }
    println!("# path: {}", args.path);
    print!("{rendered}");
    Ok(())
}
