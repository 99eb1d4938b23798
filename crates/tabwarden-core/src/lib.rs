#![warn(rust_2024_compatibility, clippy::all)]

pub mod config;
pub mod resolver;

use camino::Utf8Path;
use std::collections::HashSet;
use tabwarden_abi::{BoxCheck, CheckOptions, Diagnostics};

pub use config::{CONFIG_FILE_NAME, ConfigError, OptionTable, PathOverride, WardenConfig};
pub use resolver::{ConfigSource, OptionResolver, OptionSource};

/// In-memory source file for the Warden to check.
pub struct Source<'a> {
    pub path: &'a Utf8Path,
    pub text: &'a str,
}

/// The Warden: owns check instances and runs them over sources with the
/// options resolved for each path.
#[derive(Default)]
pub struct Warden {
    checks: Vec<BoxCheck>,
    resolver: OptionResolver,
}

impl Warden {
    #[must_use]
    pub fn new(resolver: OptionResolver) -> Self {
        Self {
            checks: Vec::new(),
            resolver,
        }
    }

    #[must_use]
    pub fn with_check(mut self, check: BoxCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn add_check(&mut self, check: BoxCheck) {
        self.checks.push(check);
    }

    /// Return the union of supported extensions for all loaded checks.
    ///
    /// - If at least one check declares specific extensions, returns `Some(HashSet)` of
    ///   those (lowercased) extensions.
    /// - If no check declares extensions, returns `None`, meaning "every file".
    #[must_use]
    pub fn watched_extensions(&self) -> Option<HashSet<String>> {
        let mut exts = HashSet::new();
        for check in &self.checks {
            for ext in &check.metadata().supported_extensions {
                exts.insert(ext.to_ascii_lowercase());
            }
        }

        if exts.is_empty() { None } else { Some(exts) }
    }

    /// Options that apply to `path` (memoized).
    pub fn options_for(&mut self, path: &Utf8Path) -> CheckOptions {
        self.resolver.resolve(path)
    }

    /// Run all checks over provided sources.
    ///
    /// Only runs a check on files whose extension matches the check's
    /// `supported_extensions`. Checks with empty `supported_extensions`
    /// run on all files.
    pub fn enforce(&mut self, sources: &[Source<'_>]) -> Diagnostics {
        let mut all = Diagnostics::new();
        for src in sources {
            let options = self.resolver.resolve(src.path);
            for check in &self.checks {
                let supported = &check.metadata().supported_extensions;
                if supported.is_empty() || Self::extension_matches(src.path, supported) {
                    let diags = check.lint(src.path.as_str(), src.text, &options);
                    tracing::debug!(
                        "{} reported {} diagnostic(s) for {}",
                        check.name(),
                        diags.len(),
                        src.path
                    );
                    all.extend(diags);
                }
            }
        }
        all
    }

    /// Check if a file's extension matches any in the supported list.
    fn extension_matches(path: &Utf8Path, supported: &[String]) -> bool {
        path.extension()
            .is_some_and(|ext| supported.iter().any(|s| s.eq_ignore_ascii_case(ext)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabwarden_abi::{Check, CheckMetadata, Code, Diagnostic, IndentStyle, Position};

    struct MockCheck {
        name: &'static str,
        exts: Vec<String>,
    }

    impl Check for MockCheck {
        fn name(&self) -> &str {
            self.name
        }

        fn lint(&self, _path: &str, _source: &str, options: &CheckOptions) -> Diagnostics {
            vec![Diagnostic::new(
                Code::tabs_error(191),
                Position::new(1, 0),
                options.indent_style.to_string(),
            )]
        }

        fn metadata(&self) -> CheckMetadata {
            CheckMetadata {
                check_version: "1".into(),
                description: String::new(),
                supported_extensions: self.exts.clone(),
            }
        }
    }

    fn mock(name: &'static str, exts: &[&str]) -> BoxCheck {
        Box::new(MockCheck {
            name,
            exts: exts.iter().map(|e| (*e).to_string()).collect(),
        })
    }

    #[test]
    fn watched_extensions_unites_declared_sets() {
        let mut warden = Warden::default();
        warden.add_check(mock("a", &["py", "PYI"]));
        warden.add_check(mock("b", &["pyw"]));

        let exts = warden.watched_extensions().unwrap();
        assert!(exts.contains("py"));
        assert!(exts.contains("pyi"));
        assert!(exts.contains("pyw"));
        assert_eq!(exts.len(), 3);
    }

    #[test]
    fn watched_extensions_none_when_only_universal() {
        let warden = Warden::default().with_check(mock("any", &[]));
        assert!(warden.watched_extensions().is_none());
    }

    #[test]
    fn enforce_skips_unsupported_extensions() {
        let mut warden = Warden::default().with_check(mock("python", &["py"]));
        let sources = [
            Source {
                path: Utf8Path::new("a.py"),
                text: "",
            },
            Source {
                path: Utf8Path::new("notes.txt"),
                text: "",
            },
        ];
        assert_eq!(warden.enforce(&sources).len(), 1);
    }

    #[test]
    fn enforce_passes_resolved_options() {
        let flags = OptionTable {
            indent_style: Some("tab".to_string()),
            ..Default::default()
        };
        let mut warden = Warden::new(OptionResolver::new(flags, OptionTable::default()))
            .with_check(mock("python", &["py"]));
        let diags = warden.enforce(&[Source {
            path: Utf8Path::new("a.py"),
            text: "",
        }]);
        assert_eq!(diags[0].message, IndentStyle::Tab.as_str());
        assert_eq!(warden.options_for(Utf8Path::new("a.py")).indent_style, IndentStyle::Tab);
    }
}
