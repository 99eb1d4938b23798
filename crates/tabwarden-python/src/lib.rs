#![warn(rust_2024_compatibility, clippy::all)]

//! check.python - tab-aware indentation rules for Python sources.

pub mod blank_lines;
pub mod categorizer;
pub mod codes;
pub mod indent_vector;
pub mod indentation;
pub mod legacy;
pub mod logical;
pub mod noqa;
pub mod tokenizer;

use tabwarden_abi::{BoxCheck, Check, CheckMetadata, CheckOptions, Diagnostic, Diagnostics};

pub use categorizer::{Category, CategorizedToken, TokenType, categorize};
pub use indent_vector::{IndentVector, MixedIndentation, ParseMode};
pub use tokenizer::{Token, TokenKind, TokenizeError, tokenize};

/// Lint with default options
#[must_use]
pub fn lint_source(source: &str) -> Diagnostics {
    lint_source_with_options(source, &CheckOptions::default())
}

/// Lint with resolved options, sorted by position.
#[must_use]
pub fn lint_source_with_options(source: &str, options: &CheckOptions) -> Diagnostics {
    let mut diags = Diagnostics::new();

    let noqa = match tokenize(source) {
        Ok(tokens) => {
            let noqa = noqa::NoqaMap::from_tokens(&tokens);
            let lines = logical::logical_lines(&tokens);
            let mut previous_indent_level = 0;
            for line in &lines {
                let categorized = categorize(&line.tokens);
                diags.extend(indentation::check(
                    &categorized,
                    previous_indent_level,
                    noqa.covers_line(&line.tokens),
                    options,
                ));
                previous_indent_level = line.indent_level;
            }
            if options.use_pycodestyle_indent {
                legacy::check_block_indentation(
                    lines.iter().filter_map(logical::LogicalLine::first_line),
                    options.indent_size,
                    &mut diags,
                );
            }
            noqa
        }
        Err(err) => {
            tracing::debug!("Tokenizing failed: {err}");
            diags.push(Diagnostic::new(
                codes::TOKENIZE_FAILED,
                err.position(),
                format!("TokenError: {err}"),
            ));
            if options.use_pycodestyle_indent {
                legacy::check_indentation_consistency(source, options.indent_size, &mut diags);
            }
            noqa::NoqaMap::default()
        }
    };

    let lines = tokenizer::LineIndex::new(source).lines();
    diags.extend((0..lines.len()).filter_map(|i| blank_lines::check(&lines, i, options)));

    diags.retain(|d| !noqa.suppresses(d));
    diags.sort_by_key(|d| d.position);
    diags
}

#[derive(Default)]
pub struct Python;

impl Check for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn lint(&self, _path: &str, source: &str, options: &CheckOptions) -> Diagnostics {
        lint_source_with_options(source, options)
    }

    fn metadata(&self) -> CheckMetadata {
        CheckMetadata {
            check_version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Tab-aware Python indentation rules".to_string(),
            supported_extensions: vec!["py".to_string(), "pyi".to_string()],
        }
    }
}

#[must_use]
pub fn init_check() -> BoxCheck {
    Box::new(Python)
}
