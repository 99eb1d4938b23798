//! CLI argument parsing and command definitions

use camino::Utf8PathBuf;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tabwarden_core::OptionTable;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "tabwarden",
    version,
    about = "Tab-aware indentation linter for Python"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Parser)]
pub enum Command {
    /// Lint files/directories once and exit
    Lint(LintArgs),
    /// Print the options resolved for a path
    Options(OptionsArgs),
    /// Write a default .tabwarden.toml
    Init(InitArgs),
}

#[derive(Debug, Parser)]
pub struct LintArgs {
    /// Files or directories to lint.
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Optional config file (TOML only). Default: .tabwarden.toml if present.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Output JSON instead of human format
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub options: OptionFlags,
}

#[derive(Debug, Parser)]
pub struct OptionsArgs {
    /// File whose options should be shown.
    pub path: Utf8PathBuf,

    /// Optional config file (TOML only). Default: .tabwarden.toml if present.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    #[command(flatten)]
    pub options: OptionFlags,
}

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Directory to write .tabwarden.toml into
    #[arg(default_value = ".")]
    pub path: Utf8PathBuf,

    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

/// Option overrides given on the command line. They win over any config file.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct OptionFlags {
    /// Enable the tab-aware continuation line checks
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub use_flake8_tabs: Option<bool>,

    /// Enable the file-level E101/E111 checks
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub use_pycodestyle_indent: Option<bool>,

    /// Character required when opening a new block
    #[arg(long, value_parser = ["tab", "space", "keep"])]
    pub indent_style: Option<String>,

    /// Continuation line styles to accept inside brackets
    #[arg(long, value_parser = ["aligned", "hanging", "both"])]
    pub continuation_style: Option<String>,

    /// Extra indentation levels for hanging call arguments
    #[arg(long, value_name = "N")]
    pub indent_levels_call: Option<usize>,

    /// Extra indentation levels for hanging definition parameters
    #[arg(long, value_name = "N")]
    pub indent_levels_defn: Option<usize>,

    /// Extra indentation levels for other hanging expressions
    #[arg(long, value_name = "N")]
    pub indent_levels_expr: Option<usize>,

    /// Spaces per tab stop
    #[arg(long, value_name = "N")]
    pub indent_size: Option<usize>,

    /// Whether blank lines should carry the surrounding indentation
    #[arg(long, value_parser = ["maybe", "always", "never"])]
    pub blank_lines_indent: Option<String>,
}

impl OptionFlags {
    #[must_use]
    pub fn into_table(self) -> OptionTable {
        OptionTable {
            use_flake8_tabs: self.use_flake8_tabs,
            use_pycodestyle_indent: self.use_pycodestyle_indent,
            indent_style: self.indent_style,
            continuation_style: self.continuation_style,
            indent_levels_call: self.indent_levels_call,
            indent_levels_defn: self.indent_levels_defn,
            indent_levels_expr: self.indent_levels_expr,
            indent_size: self.indent_size,
            blank_lines_indent: self.blank_lines_indent,
        }
    }
}
