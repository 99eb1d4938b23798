//! Grouping of raw tokens into logical lines.

use crate::tokenizer::{Token, TokenKind, expanded_width, leading_whitespace};

/// Width of a tab when measuring a logical line's block level.
const TAB_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'src> {
    /// Tokens from the first `INDENT`/`DEDENT` or code token up to and
    /// including the terminating `NEWLINE`
    pub tokens: Vec<Token<'src>>,
    /// Tab-expanded width of the first physical line's indentation
    pub indent_level: usize,
}

impl<'src> LogicalLine<'src> {
    /// Row and source text of the physical line the statement starts on.
    #[must_use]
    pub fn first_line(&self) -> Option<(usize, &'src str)> {
        self.tokens
            .iter()
            .find(|t| is_code(t))
            .map(|t| (t.start.row, t.line))
    }
}

fn is_code(token: &Token<'_>) -> bool {
    !matches!(
        token.kind,
        TokenKind::Comment
            | TokenKind::Nl
            | TokenKind::Newline
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::EndMarker
    )
}

/// Split a token stream into logical lines, dropping blank and comment-only
/// lines.
#[must_use]
pub fn logical_lines<'src>(tokens: &[Token<'src>]) -> Vec<LogicalLine<'src>> {
    let mut lines = Vec::new();
    let mut current: Vec<Token<'src>> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::EndMarker => break,
            TokenKind::Newline => {
                current.push(*token);
                let tokens = std::mem::take(&mut current);
                let indent_level = tokens
                    .iter()
                    .find(|t| is_code(t))
                    .map_or(0, |t| expanded_width(leading_whitespace(t.line), TAB_SIZE));
                lines.push(LogicalLine {
                    tokens,
                    indent_level,
                });
            }
            TokenKind::Nl if !current.iter().any(is_code) => {
                current.retain(|t| matches!(t.kind, TokenKind::Indent | TokenKind::Dedent));
            }
            _ => current.push(*token),
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn texts<'a>(line: &LogicalLine<'a>) -> Vec<&'a str> {
        line.tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn comment_and_blank_lines_are_dropped() {
        let tokens = tokenize("# header\n\nx = 1\n\n# trailer\n").unwrap();
        let lines = logical_lines(&tokens);
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines[0]), vec!["x", "=", "1", "\n"]);
    }

    #[test]
    fn bracketed_lines_form_one_logical_line() {
        let tokens = tokenize("foo(\n\ta,  # why\n)\nbar\n").unwrap();
        let lines = logical_lines(&tokens);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].tokens.len(), 9);
        assert_eq!(texts(&lines[1]), vec!["bar", "\n"]);
    }

    #[test]
    fn indent_tokens_lead_their_line() {
        let tokens = tokenize("if x:\n\t# note\n\ty\n").unwrap();
        let lines = logical_lines(&tokens);
        assert_eq!(lines[1].tokens[0].kind, TokenKind::Indent);
        assert_eq!(lines[1].indent_level, 8);
        assert_eq!(lines[0].indent_level, 0);
    }

    #[test]
    fn first_line_skips_indent_tokens() {
        let tokens = tokenize("if x:\n\tfoo(a,\n\t    b)\n").unwrap();
        let lines = logical_lines(&tokens);
        assert_eq!(lines[0].first_line(), Some((1, "if x:\n")));
        assert_eq!(lines[1].first_line(), Some((2, "\tfoo(a,\n")));
    }
}
