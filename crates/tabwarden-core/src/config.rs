//! Configuration loading for .tabwarden.toml

use garde::Validate;
use serde::{Deserialize, Serialize};
use tabwarden_abi::{
    BlankLinesIndent, CheckOptions, ContinuationStyle, DEFAULT_INDENT_LEVELS_CALL,
    DEFAULT_INDENT_LEVELS_DEFN, DEFAULT_INDENT_LEVELS_EXPR, DEFAULT_INDENT_SIZE, IndentStyle,
};

pub const CONFIG_FILE_NAME: &str = ".tabwarden.toml";

/// Root configuration from .tabwarden.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[garde(context(()))]
pub struct WardenConfig {
    #[serde(default)]
    #[garde(dive)]
    pub options: OptionTable,
    /// Per-path option tables, applied in order (later entries win)
    #[serde(default, rename = "override")]
    #[garde(dive)]
    pub overrides: Vec<PathOverride>,
}

/// Partially specified options. Unset keys fall through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "kebab-case")]
#[garde(context(()))]
pub struct OptionTable {
    #[garde(skip)]
    pub use_flake8_tabs: Option<bool>,
    #[garde(skip)]
    pub use_pycodestyle_indent: Option<bool>,
    #[garde(custom(validate_indent_style))]
    pub indent_style: Option<String>,
    #[garde(custom(validate_continuation_style))]
    pub continuation_style: Option<String>,
    #[garde(custom(validate_indent_levels))]
    pub indent_levels_call: Option<usize>,
    #[garde(custom(validate_indent_levels))]
    pub indent_levels_defn: Option<usize>,
    #[garde(custom(validate_indent_levels))]
    pub indent_levels_expr: Option<usize>,
    #[garde(custom(validate_indent_size))]
    pub indent_size: Option<usize>,
    #[garde(custom(validate_blank_lines_indent))]
    pub blank_lines_indent: Option<String>,
}

/// Options applied to files matching any of `paths` (gitignore-style globs).
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[garde(context(()))]
pub struct PathOverride {
    #[garde(custom(validate_override_paths))]
    pub paths: Vec<String>,
    #[serde(flatten)]
    #[garde(dive)]
    pub options: OptionTable,
}

impl OptionTable {
    /// Keys set on `self` win; unset keys are taken from `lower`.
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            use_flake8_tabs: self.use_flake8_tabs.or(lower.use_flake8_tabs),
            use_pycodestyle_indent: self.use_pycodestyle_indent.or(lower.use_pycodestyle_indent),
            indent_style: self.indent_style.or(lower.indent_style),
            continuation_style: self.continuation_style.or(lower.continuation_style),
            indent_levels_call: self.indent_levels_call.or(lower.indent_levels_call),
            indent_levels_defn: self.indent_levels_defn.or(lower.indent_levels_defn),
            indent_levels_expr: self.indent_levels_expr.or(lower.indent_levels_expr),
            indent_size: self.indent_size.or(lower.indent_size),
            blank_lines_indent: self.blank_lines_indent.or(lower.blank_lines_indent),
        }
    }

    /// Validate a table that did not come from a config file, e.g. CLI flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any option value is invalid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(self)
    }

    /// Fill remaining keys with defaults.
    ///
    /// `use-pycodestyle-indent` defaults to the negation of `use-flake8-tabs`.
    #[must_use]
    pub fn resolve(&self) -> CheckOptions {
        let use_flake8_tabs = self.use_flake8_tabs.unwrap_or(false);
        CheckOptions {
            use_flake8_tabs,
            use_pycodestyle_indent: self.use_pycodestyle_indent.unwrap_or(!use_flake8_tabs),
            indent_style: parse_or_default::<IndentStyle>(self.indent_style.as_deref()),
            continuation_style: parse_or_default::<ContinuationStyle>(
                self.continuation_style.as_deref(),
            ),
            indent_levels_call: self.indent_levels_call.unwrap_or(DEFAULT_INDENT_LEVELS_CALL),
            indent_levels_defn: self.indent_levels_defn.unwrap_or(DEFAULT_INDENT_LEVELS_DEFN),
            indent_levels_expr: self.indent_levels_expr.unwrap_or(DEFAULT_INDENT_LEVELS_EXPR),
            indent_size: self.indent_size.unwrap_or(DEFAULT_INDENT_SIZE),
            blank_lines_indent: parse_or_default::<BlankLinesIndent>(
                self.blank_lines_indent.as_deref(),
            ),
        }
    }
}

fn parse_or_default<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

// ============================================================================
// Custom Validators
// Note: garde requires `&Option<T>` and `&()` signatures - clippy lints suppressed
// ============================================================================

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_choice<T: std::str::FromStr<Err = String>>(value: &Option<String>) -> garde::Result {
    match value {
        Some(v) => v.parse::<T>().map(|_| ()).map_err(garde::Error::new),
        None => Ok(()),
    }
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_indent_style(value: &Option<String>, _ctx: &()) -> garde::Result {
    validate_choice::<IndentStyle>(value)
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_continuation_style(value: &Option<String>, _ctx: &()) -> garde::Result {
    validate_choice::<ContinuationStyle>(value)
}

#[allow(clippy::ref_option, clippy::trivially_copy_pass_by_ref)]
fn validate_blank_lines_indent(value: &Option<String>, _ctx: &()) -> garde::Result {
    validate_choice::<BlankLinesIndent>(value)
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_indent_levels(value: &Option<usize>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        if *v <= 8 {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "{v} is outside the range 0-8 - common values are 1 or 2"
            )))
        }
    } else {
        Ok(())
    }
}

#[allow(
    clippy::ref_option,
    clippy::trivially_copy_pass_by_ref,
    clippy::option_if_let_else
)]
fn validate_indent_size(value: &Option<usize>, _ctx: &()) -> garde::Result {
    if let Some(v) = value {
        if *v >= 1 && *v <= 16 {
            Ok(())
        } else {
            Err(garde::Error::new(format!(
                "{v} is outside the range 1-16 - common values are 2, 4, or 8"
            )))
        }
    } else {
        Ok(())
    }
}

#[allow(clippy::ptr_arg, clippy::trivially_copy_pass_by_ref)]
fn validate_override_paths(value: &Vec<String>, _ctx: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("an override needs at least one path glob"));
    }
    if value.iter().any(|glob| glob.trim().is_empty()) {
        return Err(garde::Error::new("path globs must not be empty"));
    }
    Ok(())
}

// ============================================================================
// Config Error
// ============================================================================

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config read error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("config validation error: {0}")]
    Validation(String),
    #[error("config glob error: {0}")]
    Glob(String),
}

// ============================================================================
// Config Loading
// ============================================================================

impl WardenConfig {
    /// Parse and validate configuration text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML content is invalid.
    /// Returns `ConfigError::Validation` if any option value fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(config)
    }

    /// Load configuration from a TOML file with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`WardenConfig::parse`].
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::parse(&content)?;
        tracing::info!(
            "Loaded {} with {} override(s)",
            path.display(),
            config.overrides.len()
        );
        Ok(config)
    }

    /// Load from default location (.tabwarden.toml in current directory).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` with details if loading or validation fails.
    pub fn load_default_strict() -> Result<Option<Self>, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
        let config_path = cwd.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        Self::from_file(&config_path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_config() {
        let toml = r#"
format = "json"

[options]
use-flake8-tabs = true
indent-style = "tab"
continuation-style = "hanging"
indent-levels-call = 1
indent-levels-defn = 2
indent-levels-expr = 1
indent-size = 4
blank-lines-indent = "always"

[[override]]
paths = ["legacy/**", "*.pyi"]
indent-style = "space"
"#;

        let config = WardenConfig::parse(toml).unwrap();
        assert_eq!(config.options.use_flake8_tabs, Some(true));
        assert_eq!(config.options.indent_style.as_deref(), Some("tab"));
        assert_eq!(config.options.blank_lines_indent.as_deref(), Some("always"));
        assert_eq!(config.overrides.len(), 1);
        assert_eq!(config.overrides[0].paths, vec!["legacy/**", "*.pyi"]);
        assert_eq!(
            config.overrides[0].options.indent_style.as_deref(),
            Some("space")
        );
        assert_eq!(config.overrides[0].options.use_flake8_tabs, None);
    }

    #[test]
    fn empty_config_is_valid() {
        let config = WardenConfig::parse("").unwrap();
        assert_eq!(config.options, OptionTable::default());
        assert!(config.overrides.is_empty());
    }

    #[test]
    fn rejects_unknown_indent_style() {
        let settings = OptionTable {
            indent_style: Some("tabs".to_string()), // Should be "tab"
            ..Default::default()
        };

        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("tab, space, keep"));
    }

    #[test]
    fn rejects_unknown_continuation_style_in_file() {
        let toml = r#"
[options]
continuation-style = "diagonal"
"#;
        let err = WardenConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("aligned, hanging, both"));
    }

    #[test]
    fn rejects_indent_size_out_of_range() {
        let settings = OptionTable {
            indent_size: Some(32),
            ..Default::default()
        };

        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("1-16"));
    }

    #[test]
    fn rejects_indent_levels_out_of_range() {
        let settings = OptionTable {
            indent_levels_defn: Some(9),
            ..Default::default()
        };

        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("0-8"));
    }

    #[test]
    fn rejects_negative_indent_size_at_parse() {
        let toml = r"
[options]
indent-size = -4
";
        let err = WardenConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_override_without_paths() {
        let toml = r#"
[[override]]
paths = []
indent-style = "space"
"#;
        let err = WardenConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("at least one path glob"));
    }

    #[test]
    fn override_options_are_validated() {
        let toml = r#"
[[override]]
paths = ["tests/**"]
blank-lines-indent = "sometimes"
"#;
        let err = WardenConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn higher_table_wins_over_lower() {
        let flags = OptionTable {
            indent_style: Some("space".to_string()),
            ..Default::default()
        };
        let file = OptionTable {
            indent_style: Some("tab".to_string()),
            indent_size: Some(8),
            ..Default::default()
        };
        let merged = flags.or(file);
        assert_eq!(merged.indent_style.as_deref(), Some("space"));
        assert_eq!(merged.indent_size, Some(8));
    }

    #[test]
    fn validated_rejects_bad_flag_values() {
        let flags = OptionTable {
            indent_levels_call: Some(12),
            ..Default::default()
        };
        assert!(matches!(flags.validated(), Err(ConfigError::Validation(_))));
        assert!(OptionTable::default().validated().is_ok());
    }

    #[test]
    fn resolve_fills_defaults() {
        let options = OptionTable::default().resolve();
        assert_eq!(options, CheckOptions::default());
    }

    #[test]
    fn pycodestyle_indent_follows_flake8_tabs_when_unset() {
        let enabled = OptionTable {
            use_flake8_tabs: Some(true),
            ..Default::default()
        }
        .resolve();
        assert!(enabled.use_flake8_tabs);
        assert!(!enabled.use_pycodestyle_indent);

        let explicit = OptionTable {
            use_flake8_tabs: Some(true),
            use_pycodestyle_indent: Some(true),
            ..Default::default()
        }
        .resolve();
        assert!(explicit.use_pycodestyle_indent);
    }

    #[test]
    fn resolve_parses_choices() {
        let options = OptionTable {
            indent_style: Some("tab".to_string()),
            continuation_style: Some("aligned".to_string()),
            blank_lines_indent: Some("never".to_string()),
            indent_levels_expr: Some(2),
            ..Default::default()
        }
        .resolve();
        assert_eq!(options.indent_style, IndentStyle::Tab);
        assert_eq!(options.continuation_style, ContinuationStyle::Aligned);
        assert_eq!(options.blank_lines_indent, BlankLinesIndent::Never);
        assert_eq!(options.indent_levels_expr, 2);
    }
}
