//! Annotates the tokens of one logical line with a coarse type and the
//! syntactic category of the bracket scope they sit in.

use crate::tokenizer::{Token, TokenKind};

/// Python keywords that start or join statements. The value constants
/// (`True`, `False`, `None`) behave like names and are not listed.
pub const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Indent,
    Dedent,
    BracketOpen,
    BracketClose,
    Keyword,
    Comment,
    /// End of a physical line inside the logical line
    EndPline,
    /// End of the logical line
    EndLline,
    Other,
}

impl TokenType {
    #[must_use]
    pub const fn is_line_end(self) -> bool {
        matches!(self, Self::EndPline | Self::EndLline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Argument list of a call
    Call,
    /// Parameter list of a `def` or base list of a `class`
    Defn,
    Expr,
    Stmt,
}

impl Category {
    /// Name used in diagnostic messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Defn => "definition",
            Self::Expr => "expression",
            Self::Stmt => "statement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorizedToken<'src> {
    pub token: Token<'src>,
    pub ty: TokenType,
    pub category: Category,
}

fn is_open(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Op && matches!(token.text, "(" | "[" | "{")
}

fn is_close(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Op && matches!(token.text, ")" | "]" | "}")
}

fn is_keyword_token(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Name && is_keyword(token.text)
}

/// Whether `(` right after `prev` starts an argument list.
fn introduces_call(prev: Option<&Token<'_>>) -> bool {
    prev.is_some_and(|prev| {
        (prev.kind == TokenKind::Name && !is_keyword(prev.text))
            || prev.is_op(")")
            || prev.is_op("]")
    })
}

/// Categorize the raw tokens of one logical line.
///
/// A physical line break that produced no `NL` token (a backslash
/// continuation) gets a synthetic `EndPline` so that every physical line is
/// terminated.
#[must_use]
pub fn categorize<'src>(tokens: &[Token<'src>]) -> Vec<CategorizedToken<'src>> {
    let mut result = Vec::with_capacity(tokens.len());
    let mut categories = vec![Category::Stmt];
    let mut previous: Option<&Token<'src>> = None;
    let mut significant: Option<&Token<'src>> = None;
    let mut definition_pending = false;

    for token in tokens {
        let current = categories.last().copied().unwrap_or(Category::Stmt);

        if let Some(prev) = previous
            && token.start.row > prev.end.row
            && !matches!(prev.kind, TokenKind::Nl | TokenKind::Newline)
        {
            result.push(CategorizedToken {
                token: Token {
                    kind: TokenKind::Nl,
                    text: "",
                    start: prev.end,
                    end: prev.end,
                    line: prev.line,
                },
                ty: TokenType::EndPline,
                category: current,
            });
        }

        let (ty, category) = match token.kind {
            TokenKind::Indent => (TokenType::Indent, current),
            TokenKind::Dedent => (TokenType::Dedent, current),
            TokenKind::Comment => (TokenType::Comment, current),
            TokenKind::Nl => (TokenType::EndPline, current),
            TokenKind::Newline => (TokenType::EndLline, current),
            _ if is_open(token) => {
                let pushed = if definition_pending {
                    definition_pending = false;
                    Category::Defn
                } else if token.text == "(" && introduces_call(significant) {
                    Category::Call
                } else {
                    Category::Expr
                };
                categories.push(pushed);
                (TokenType::BracketOpen, pushed)
            }
            _ if is_close(token) => {
                let popped = if categories.len() > 1 {
                    categories.pop().unwrap_or(current)
                } else {
                    current
                };
                (TokenType::BracketClose, popped)
            }
            _ if is_keyword_token(token) => {
                if matches!(token.text, "def" | "class") {
                    definition_pending = true;
                }
                (TokenType::Keyword, current)
            }
            _ => {
                // A header that ends without brackets, e.g. `class A: ...`
                if categories.len() == 1 && (token.is_op(":") || token.is_op("=")) {
                    definition_pending = false;
                }
                (TokenType::Other, current)
            }
        };

        if !matches!(
            ty,
            TokenType::Comment | TokenType::EndPline | TokenType::EndLline
        ) {
            significant = Some(token);
        }
        previous = Some(token);
        result.push(CategorizedToken {
            token: *token,
            ty,
            category,
        });
    }

    result
}
