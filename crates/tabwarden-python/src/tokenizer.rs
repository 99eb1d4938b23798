//! Python tokenizer producing the stdlib `tokenize` token kinds.
//!
//! Lexing is done by a `logos` lexer over the whole file; a second pass adds
//! the line structure (`NEWLINE`/`NL`, `INDENT`/`DEDENT`, `ENDMARKER`).

use logos::Logos;
use memchr::memchr2_iter;
use tabwarden_abi::Position;
use thiserror::Error;

/// Width of a tab when comparing block indentation, as Python does.
const TAB_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Comment,
    /// End of a logical line
    Newline,
    /// Newline that does not end a logical line
    Nl,
    Indent,
    Dedent,
    EndMarker,
    ErrorToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub start: Position,
    pub end: Position,
    /// Physical line the token starts on, terminator included
    pub line: &'src str,
}

impl Token<'_> {
    #[must_use]
    pub fn is_op(&self, text: &str) -> bool {
        self.kind == TokenKind::Op && self.text == text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("EOF in multi-line string starting at line {}", .0.row)]
    UnterminatedString(Position),
    #[error("unindent does not match any outer indentation level (line {})", .0.row)]
    InconsistentDedent(Position),
}

impl TokenizeError {
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnterminatedString(position) | Self::InconsistentDedent(position) => *position,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LexError {
    #[default]
    Unknown,
    UnterminatedString,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\x0c]+")]
enum Lexeme {
    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"\\(\r\n|\n|\r)")]
    Continuation,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[regex(r"([A-Za-z_]|[^\x00-\x7F])([A-Za-z0-9_]|[^\x00-\x7F])*")]
    Name,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[jJ]?")]
    #[regex(r"0[xXoObB][0-9a-fA-F_]+")]
    Number,

    #[regex(r#"[rRbBuUfF]{0,2}'([^'\\\r\n]|\\(\r\n|.|\n))*'"#)]
    #[regex(r#"[rRbBuUfF]{0,2}"([^"\\\r\n]|\\(\r\n|.|\n))*""#)]
    String,

    #[regex(r#"[rRbBuUfF]{0,2}'''"#, close_long_string)]
    #[regex(r#"[rRbBuUfF]{0,2}""""#, close_long_string)]
    LongString,

    #[regex(r"[(\[{]")]
    Open,

    #[regex(r"[)\]}]")]
    Close,

    #[regex(r"\*\*=?|//=?|>>=?|<<=?|->|:=|\.\.\.|[-+*/%@&|^=<>!]=|[-+*/%@&|^~<>=.,:;]")]
    Op,
}

/// Consume the body of a triple-quoted string up to its closing quotes.
fn close_long_string(lex: &mut logos::Lexer<'_, Lexeme>) -> Result<(), LexError> {
    let quote = lex.slice().as_bytes()[lex.slice().len() - 1];
    let body = lex.remainder().as_bytes();
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            b'\\' => i += 2,
            b if b == quote && body[i..].starts_with(&[quote; 3]) => {
                lex.bump(i + 3);
                return Ok(());
            }
            _ => i += 1,
        }
    }
    lex.bump(body.len());
    Err(LexError::UnterminatedString)
}

/// Byte offsets of the physical lines of a source text.
pub struct LineIndex<'src> {
    source: &'src str,
    starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        for pos in memchr2_iter(b'\n', b'\r', bytes) {
            if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                continue;
            }
            if pos + 1 < bytes.len() {
                starts.push(pos + 1);
            }
        }
        Self { source, starts }
    }

    /// Number of physical lines; an empty source has none.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.source.is_empty() { 0 } else { self.starts.len() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Physical line `row` (1-based), terminator included.
    #[must_use]
    pub fn line(&self, row: usize) -> &'src str {
        let Some(&start) = self.starts.get(row.wrapping_sub(1)) else {
            return "";
        };
        let end = self.starts.get(row).copied().unwrap_or(self.source.len());
        &self.source[start..end]
    }

    #[must_use]
    pub fn lines(&self) -> Vec<&'src str> {
        (1..=self.len()).map(|row| self.line(row)).collect()
    }

    /// 1-based row and 0-based character column of a byte offset.
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let row = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[row - 1];
        Position::new(row, self.source[start..offset].chars().count())
    }
}

/// Tab-expanded width of a run of leading whitespace.
#[must_use]
pub fn expanded_width(whitespace: &str, tab_size: usize) -> usize {
    whitespace.chars().fold(0, |width, ch| match ch {
        '\t' => (width / tab_size + 1) * tab_size,
        _ => width + 1,
    })
}

/// Leading tab/space/form-feed run of a line.
#[must_use]
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| !matches!(c, ' ' | '\t' | '\x0c'))
        .unwrap_or(line.len());
    &line[..end]
}

struct Builder<'src> {
    index: LineIndex<'src>,
    tokens: Vec<Token<'src>>,
    indents: Vec<usize>,
    depth: usize,
    at_line_start: bool,
    line_has_code: bool,
}

impl<'src> Builder<'src> {
    fn push(&mut self, kind: TokenKind, text: &'src str, start: Position, end: Position) {
        let line = self.index.line(start.row);
        self.tokens.push(Token {
            kind,
            text,
            start,
            end,
            line,
        });
    }

    /// Emit `INDENT`/`DEDENT` for the first code token of a line.
    fn indentation(&mut self, start: Position) -> Result<(), TokenizeError> {
        let line = self.index.line(start.row);
        let whitespace = leading_whitespace(line);
        let width = expanded_width(whitespace, TAB_SIZE);
        let top = self.indents.last().copied().unwrap_or(0);

        if width > top {
            self.indents.push(width);
            self.push(TokenKind::Indent, whitespace, Position::new(start.row, 0), start);
        } else if width < top {
            while self.indents.last().is_some_and(|&level| width < level) {
                self.indents.pop();
                self.push(TokenKind::Dedent, "", start, start);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(TokenizeError::InconsistentDedent(start));
            }
        }
        Ok(())
    }
}

/// Tokenize a whole Python source file.
///
/// # Errors
///
/// Returns a `TokenizeError` for an unterminated triple-quoted string or a
/// dedent to a level that was never opened.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    let mut builder = Builder {
        index: LineIndex::new(source),
        tokens: Vec::new(),
        indents: vec![0],
        depth: 0,
        at_line_start: true,
        line_has_code: false,
    };

    let mut lexer = Lexeme::lexer(source);
    while let Some(lexeme) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        let start = builder.index.position(span.start);
        let depth = builder.depth;

        let kind = match lexeme {
            Ok(Lexeme::Newline) => {
                let kind = if builder.depth == 0 && builder.line_has_code {
                    builder.line_has_code = false;
                    TokenKind::Newline
                } else {
                    TokenKind::Nl
                };
                builder.at_line_start = true;
                let end = Position::new(start.row, start.col + text.chars().count());
                builder.push(kind, text, start, end);
                continue;
            }
            Ok(Lexeme::Continuation) => continue,
            Ok(Lexeme::Comment) => {
                let end = builder.index.position(span.end);
                builder.push(TokenKind::Comment, text, start, end);
                continue;
            }
            Err(LexError::UnterminatedString) => {
                return Err(TokenizeError::UnterminatedString(start));
            }
            Ok(Lexeme::Name) => TokenKind::Name,
            Ok(Lexeme::Number) => TokenKind::Number,
            Ok(Lexeme::String | Lexeme::LongString) => TokenKind::String,
            Ok(Lexeme::Open) => {
                builder.depth += 1;
                TokenKind::Op
            }
            Ok(Lexeme::Close) => {
                builder.depth = builder.depth.saturating_sub(1);
                TokenKind::Op
            }
            Ok(Lexeme::Op) => TokenKind::Op,
            Err(LexError::Unknown) => TokenKind::ErrorToken,
        };

        if builder.at_line_start {
            if depth == 0 {
                builder.indentation(start)?;
            }
            builder.at_line_start = false;
        }
        builder.line_has_code = true;
        let end = builder.index.position(span.end);
        builder.push(kind, text, start, end);
    }

    let eof = builder.index.position(source.len());
    if builder.line_has_code {
        builder.push(TokenKind::Newline, "", eof, eof);
    }
    let last_row = builder.index.len();
    let end = Position::new(last_row + 1, 0);
    while builder.indents.len() > 1 {
        builder.indents.pop();
        builder.push(TokenKind::Dedent, "", end, end);
    }
    builder.push(TokenKind::EndMarker, "", end, end);

    Ok(builder.tokens)
}
