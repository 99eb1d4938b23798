#![warn(rust_2024_compatibility, clippy::all)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location of a diagnostic: 1-based row, 0-based character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Reporting family of a code, rendered as its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeFamily {
    /// `ET`: tab-aware indentation errors
    TabsError,
    /// `WT`: tab-aware style warnings
    TabsWarning,
    /// `E`: pycodestyle-compatible errors
    Error,
    /// `W`: pycodestyle-compatible warnings
    Warning,
}

impl CodeFamily {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::TabsError => "ET",
            Self::TabsWarning => "WT",
            Self::Error => "E",
            Self::Warning => "W",
        }
    }
}

/// Diagnostic code such as `ET121` or `WT293`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Code {
    pub family: CodeFamily,
    pub number: u16,
}

impl Code {
    #[must_use]
    pub const fn tabs_error(number: u16) -> Self {
        Self {
            family: CodeFamily::TabsError,
            number,
        }
    }

    #[must_use]
    pub const fn tabs_warning(number: u16) -> Self {
        Self {
            family: CodeFamily::TabsWarning,
            number,
        }
    }

    #[must_use]
    pub const fn error(number: u16) -> Self {
        Self {
            family: CodeFamily::Error,
            number,
        }
    }

    #[must_use]
    pub const fn warning(number: u16) -> Self {
        Self {
            family: CodeFamily::Warning,
            number,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.family.prefix(), self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: Code,
    pub message: String,
    pub position: Position,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: Code, position: Position, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            position,
        }
    }
}

pub type Diagnostics = Vec<Diagnostic>;

/// Indentation character required on the first line of a new block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Tab,
    Space,
    #[default]
    Keep,
}

/// Continuation line styles accepted inside brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuationStyle {
    Aligned,
    Hanging,
    #[default]
    Both,
}

/// Whether blank lines carry the indentation of their surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlankLinesIndent {
    #[default]
    Maybe,
    Always,
    Never,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(
                        "'{other}' is not valid - use {}",
                        [$($text),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(IndentStyle { Tab => "tab", Space => "space", Keep => "keep" });
string_enum!(ContinuationStyle { Aligned => "aligned", Hanging => "hanging", Both => "both" });
string_enum!(BlankLinesIndent { Maybe => "maybe", Always => "always", Never => "never" });

/// Fully resolved options for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckOptions {
    /// Master switch for the continuation-line algorithm
    pub use_flake8_tabs: bool,
    pub use_pycodestyle_indent: bool,
    pub indent_style: IndentStyle,
    pub continuation_style: ContinuationStyle,
    pub indent_levels_call: usize,
    pub indent_levels_defn: usize,
    pub indent_levels_expr: usize,
    /// Spaces per tab stop
    pub indent_size: usize,
    pub blank_lines_indent: BlankLinesIndent,
}

pub const DEFAULT_INDENT_LEVELS_CALL: usize = 1;
pub const DEFAULT_INDENT_LEVELS_DEFN: usize = 2;
pub const DEFAULT_INDENT_LEVELS_EXPR: usize = 1;
pub const DEFAULT_INDENT_SIZE: usize = 4;

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            use_flake8_tabs: false,
            use_pycodestyle_indent: true,
            indent_style: IndentStyle::default(),
            continuation_style: ContinuationStyle::default(),
            indent_levels_call: DEFAULT_INDENT_LEVELS_CALL,
            indent_levels_defn: DEFAULT_INDENT_LEVELS_DEFN,
            indent_levels_expr: DEFAULT_INDENT_LEVELS_EXPR,
            indent_size: DEFAULT_INDENT_SIZE,
            blank_lines_indent: BlankLinesIndent::default(),
        }
    }
}

/// Metadata describing a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMetadata {
    pub check_version: String,
    pub description: String,
    /// File extensions this check handles (e.g., `["py", "pyi"]`); empty means all files
    pub supported_extensions: Vec<String>,
}

/// Trait implemented by every language check the warden runs.
pub trait Check: Send + Sync {
    /// Human-friendly check name, e.g. "python".
    #[must_use]
    fn name(&self) -> &str;

    /// Lint a single file with the options resolved for its path.
    fn lint(&self, path: &str, source: &str, options: &CheckOptions) -> Diagnostics;

    #[must_use]
    fn metadata(&self) -> CheckMetadata;
}

/// Boxed check for dynamic dispatch.
pub type BoxCheck = Box<dyn Check>;
