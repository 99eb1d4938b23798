//! Block and continuation-line indentation checks for one logical line.
//!
//! Expected indentation is tracked as a stack of [`IndentVector`]s: the
//! line's own indentation, a continuation slot, and one entry per open
//! bracket. The expected indentation of a physical line is the sum of the
//! stack when the line starts.

use tabwarden_abi::{
    CheckOptions, ContinuationStyle, Diagnostic, Diagnostics, IndentStyle, Position,
};

use crate::categorizer::{Category, CategorizedToken, TokenType};
use crate::codes;
use crate::indent_vector::{IndentVector, ONE_TAB, ParseMode, ZERO, plural};

/// Entries below the first bracket: `first_indent` and the continuation slot.
const BASE_ENTRIES: usize = 2;

struct IndentStack {
    entries: Vec<IndentVector>,
}

impl IndentStack {
    fn new(first_indent: IndentVector) -> Self {
        Self {
            entries: vec![first_indent, ZERO],
        }
    }

    fn total(&self) -> IndentVector {
        self.entries.iter().sum()
    }

    fn open_brackets(&self) -> usize {
        self.entries.len() - BASE_ENTRIES
    }

    fn push(&mut self, entry: IndentVector) {
        self.entries.push(entry);
    }

    fn pop(&mut self) {
        if self.open_brackets() > 0 {
            self.entries.pop();
        }
    }

    /// Sum of the innermost `count` bracket entries.
    fn innermost(&self, count: usize) -> IndentVector {
        let count = count.min(self.open_brackets());
        self.entries[self.entries.len() - count..].iter().sum()
    }

    fn set_continuation(&mut self, indent: IndentVector) {
        self.entries[1] = indent;
    }
}

/// Check one categorized logical line.
///
/// `previous_indent_level` is the block level of the previous logical line;
/// `noqa` suppresses the whole line.
#[must_use]
pub fn check(
    tokens: &[CategorizedToken<'_>],
    previous_indent_level: usize,
    noqa: bool,
    options: &CheckOptions,
) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    let Some(first) = tokens.first() else {
        return diagnostics;
    };
    if noqa {
        return diagnostics;
    }

    if first.ty == TokenType::Indent && previous_indent_level == 0 {
        check_block_style(first, options.indent_style, &mut diagnostics);
    }

    if options.use_flake8_tabs
        && let Err(mixed) = check_continuation_lines(tokens, options, &mut diagnostics)
    {
        diagnostics.push(mixed);
    }

    diagnostics
}

fn check_block_style(indent: &CategorizedToken<'_>, style: IndentStyle, out: &mut Diagnostics) {
    let whitespace = indent.token.text;
    let message = match style {
        IndentStyle::Tab if whitespace.chars().any(|c| c != '\t') => {
            "indentation contains spaces, but indent-style=tab requires tabs"
        }
        IndentStyle::Space if whitespace.chars().any(|c| c != ' ') => {
            "indentation contains tabs, but indent-style=space requires spaces"
        }
        _ => return,
    };
    out.push(Diagnostic::new(
        codes::BLOCK_INDENT_STYLE,
        Position::new(indent.token.start.row, 0),
        message,
    ));
}

fn parse_indent(line: &str, row: usize, mode: ParseMode) -> Result<IndentVector, Diagnostic> {
    IndentVector::parse(line, mode).map_err(|mixed| {
        Diagnostic::new(codes::MIXED_INDENTATION, Position::new(row, 0), mixed.to_string())
    })
}

/// Split a logical line into physical lines, each ending at a line end.
fn physical_lines<'a, 'src>(
    tokens: &'a [CategorizedToken<'src>],
) -> Vec<&'a [CategorizedToken<'src>]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.ty.is_line_end() {
            lines.push(&tokens[start..=i]);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        lines.push(&tokens[start..]);
    }
    lines
}

fn is_code(token: &CategorizedToken<'_>) -> bool {
    !matches!(
        token.ty,
        TokenType::Indent
            | TokenType::Dedent
            | TokenType::Comment
            | TokenType::EndPline
            | TokenType::EndLline
    )
}

/// Indentation implied by a leading keyword run, e.g. `assert ` or
/// `with open(f) as a, `.
fn keyword_indent(line: &[CategorizedToken<'_>]) -> IndentVector {
    let mut tokens = line
        .iter()
        .filter(|t| !matches!(t.ty, TokenType::Indent | TokenType::Dedent));
    let Some(head) = tokens.next().filter(|t| t.ty == TokenType::Keyword) else {
        return ONE_TAB;
    };
    match tokens.find(|t| t.ty != TokenType::Keyword) {
        Some(next) if is_code(next) && next.token.start.row == head.token.start.row => {
            IndentVector::spaces(
                i64::try_from(next.token.start.col - head.token.start.col).unwrap_or(i64::MAX),
            )
        }
        _ => ONE_TAB,
    }
}

/// Tab or space amount for a new hanging indentation level.
///
/// Tabs are used when the current indentation is written with tabs only;
/// without any current indentation, tabs are used if the next non-blank line
/// contains a tab or cannot be parsed.
fn hanging_unit(total: IndentVector, next_line: Option<&str>, indent_size: usize) -> IndentVector {
    let use_tabs = if total.characters() > 0 {
        total.spaces == 0
    } else {
        next_line
            .and_then(|line| IndentVector::parse(line, ParseMode::Lenient).ok())
            .is_none_or(|next| next.tabs > 0)
    };
    if use_tabs {
        ONE_TAB
    } else {
        IndentVector::spaces(i64::try_from(indent_size).unwrap_or(i64::MAX))
    }
}

const fn levels_for(category: Category, options: &CheckOptions) -> usize {
    match category {
        Category::Call => options.indent_levels_call,
        Category::Defn => options.indent_levels_defn,
        Category::Expr | Category::Stmt => options.indent_levels_expr,
    }
}

fn check_continuation_lines(
    tokens: &[CategorizedToken<'_>],
    options: &CheckOptions,
    out: &mut Diagnostics,
) -> Result<(), Diagnostic> {
    let lines = physical_lines(tokens);
    let Some(first_line) = lines.first() else {
        return Ok(());
    };
    let first_row = first_line[0].token.start.row;
    let first_indent = parse_indent(first_line[0].token.line, first_row, ParseMode::Strict)?;
    let mut stack = IndentStack::new(first_indent);
    let keyword = keyword_indent(first_line);

    for (index, line) in lines.iter().enumerate() {
        let head = &line[0];
        let row = head.token.start.row;
        let line_indent = if index == 0 {
            first_indent
        } else {
            parse_indent(head.token.line, row, ParseMode::Lenient)?
        };

        if line.iter().all(|t| t.ty.is_line_end()) {
            continue;
        }

        let mut expected = stack.total();

        let last = line.iter().rev().find(|t| {
            !matches!(t.ty, TokenType::Comment | TokenType::EndPline | TokenType::EndLline)
        });
        let hanging_next = last.is_some_and(|t| t.ty == TokenType::BracketOpen);

        // Brackets opened on this line that are still open at its end.
        let mut still_open: Vec<usize> = Vec::new();
        for (i, token) in line.iter().enumerate() {
            match token.ty {
                TokenType::BracketOpen => still_open.push(i),
                TokenType::BracketClose => {
                    still_open.pop();
                }
                _ => {}
            }
        }

        match options.continuation_style {
            ContinuationStyle::Aligned if hanging_next => {
                if let Some(bracket) = last {
                    out.push(Diagnostic::new(
                        codes::CONTINUATION_STYLE,
                        bracket.token.start,
                        "hanging indentation used, but continuation-style=aligned requires aligned indentation",
                    ));
                }
            }
            ContinuationStyle::Hanging if !hanging_next => {
                if let Some(&bracket) = still_open.first() {
                    out.push(Diagnostic::new(
                        codes::CONTINUATION_STYLE,
                        line[bracket].token.start,
                        "aligned indentation used, but continuation-style=hanging requires hanging indentation",
                    ));
                }
            }
            _ => {}
        }

        let initial_closers = line
            .iter()
            .filter(|t| !matches!(t.ty, TokenType::Indent | TokenType::Dedent))
            .take_while(|t| t.ty == TokenType::BracketClose)
            .count();
        expected -= stack.innermost(initial_closers);

        let outermost = still_open.first().copied();
        for (i, token) in line.iter().enumerate() {
            match token.ty {
                TokenType::BracketOpen if hanging_next => {
                    let entry = if Some(i) == outermost {
                        let category = last.map_or(Category::Expr, |t| t.category);
                        let levels = i64::try_from(levels_for(category, options)).unwrap_or(0);
                        let next_line = next_code_line(&lines[index + 1..]);
                        hanging_unit(stack.total(), next_line, options.indent_size)
                            .scale((levels, levels))
                    } else {
                        ZERO
                    };
                    stack.push(entry);
                }
                TokenType::BracketOpen => {
                    let end = i64::try_from(token.token.end.col).unwrap_or(i64::MAX);
                    stack.push(IndentVector::spaces(end - stack.total().characters()));
                }
                TokenType::BracketClose => stack.pop(),
                _ => {}
            }
        }

        if stack.open_brackets() == 0 {
            stack.set_continuation(keyword);
        }

        if line_indent != expected {
            let category = line
                .iter()
                .find(|t| !matches!(t.ty, TokenType::Indent | TokenType::Dedent))
                .map_or(Category::Stmt, |t| t.category);
            out.push(mismatch(expected, line_indent, first_indent, category, row));
        }
    }

    Ok(())
}

/// Source text of the next physical line that holds more than a line end.
fn next_code_line<'src>(lines: &[&[CategorizedToken<'src>]]) -> Option<&'src str> {
    lines
        .iter()
        .find(|line| !line.iter().all(|t| t.ty.is_line_end()))
        .map(|line| line[0].token.line)
}

fn mismatch(
    expected: IndentVector,
    actual: IndentVector,
    first_indent: IndentVector,
    category: Category,
    row: usize,
) -> Diagnostic {
    let category = category.describe();
    let (code, summary) = if actual == first_indent {
        (codes::NOT_INDENTED, format!("continuation line of {category} is not indented"))
    } else if expected.spaces == 0 && actual.spaces == 0 {
        if actual.tabs < expected.tabs {
            (codes::TOO_FEW_TABS, format!("too few tabs at start of {category} line"))
        } else {
            (codes::TOO_MANY_TABS, format!("too many tabs at start of {category} line"))
        }
    } else if actual.spaces > expected.spaces {
        (codes::TOO_MANY_SPACES, format!("too many spaces at start of {category} line"))
    } else if actual.spaces < expected.spaces {
        (codes::TOO_FEW_SPACES, format!("too few spaces at start of {category} line"))
    } else {
        (
            codes::UNEXPECTED_INDENTATION,
            format!("unexpected number of tabs and spaces at start of {category} line"),
        )
    };
    let message = format!(
        "{summary} (expected {}, got {})",
        amount(expected, actual),
        amount(actual, expected)
    );
    Diagnostic::new(code, Position::new(row, 0), message)
}

/// Describe `value`, naming only the unit that differs from `other`.
fn amount(value: IndentVector, other: IndentVector) -> String {
    if value.spaces == other.spaces {
        plural(value.tabs, "tab")
    } else if value.tabs == other.tabs {
        plural(value.spaces, "space")
    } else {
        value.to_string()
    }
}
