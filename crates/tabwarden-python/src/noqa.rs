//! `# noqa` comment handling.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tabwarden_abi::Diagnostic;

use crate::tokenizer::{Token, TokenKind};

static NOQA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#\s*noqa(?::[\s]?(?P<codes>[A-Z]+[0-9]+(?:[,\s]+[A-Z]+[0-9]+)*))?").unwrap()
});

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]+[0-9]+").unwrap());

/// Suppressions collected from the comments of one file, keyed by row.
#[derive(Debug, Default)]
pub struct NoqaMap {
    blanket: HashSet<usize>,
    codes: HashMap<usize, Vec<String>>,
}

impl NoqaMap {
    #[must_use]
    pub fn from_tokens(tokens: &[Token<'_>]) -> Self {
        let mut map = Self::default();
        for token in tokens.iter().filter(|t| t.kind == TokenKind::Comment) {
            let Some(caps) = NOQA_RE.captures(token.text) else {
                continue;
            };
            let row = token.start.row;
            match caps.name("codes") {
                Some(codes) => map.codes.entry(row).or_default().extend(
                    CODE_RE
                        .find_iter(codes.as_str())
                        .map(|m| m.as_str().to_ascii_uppercase()),
                ),
                None => {
                    map.blanket.insert(row);
                }
            }
        }
        map
    }

    /// Whether a bare `# noqa` sits on `row`.
    #[must_use]
    pub fn is_blanket(&self, row: usize) -> bool {
        self.blanket.contains(&row)
    }

    /// Whether any of `tokens` carries a bare `# noqa`.
    #[must_use]
    pub fn covers_line(&self, tokens: &[Token<'_>]) -> bool {
        tokens
            .iter()
            .any(|t| t.kind == TokenKind::Comment && self.is_blanket(t.start.row))
    }

    /// Whether a `# noqa` on the diagnostic's row silences it.
    #[must_use]
    pub fn suppresses(&self, diagnostic: &Diagnostic) -> bool {
        let row = diagnostic.position.row;
        if self.is_blanket(row) {
            return true;
        }
        let code = diagnostic.code.to_string();
        self.codes
            .get(&row)
            .is_some_and(|codes| codes.iter().any(|c| *c == code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use tabwarden_abi::{Code, Position};

    fn diag(code: Code, row: usize) -> Diagnostic {
        Diagnostic::new(code, Position::new(row, 0), "x")
    }

    #[test]
    fn bare_noqa_suppresses_everything_on_its_row() {
        let tokens = tokenize("x = 1  # NoQA\ny = 2\n").unwrap();
        let map = NoqaMap::from_tokens(&tokens);
        assert!(map.is_blanket(1));
        assert!(map.suppresses(&diag(Code::tabs_warning(291), 1)));
        assert!(!map.suppresses(&diag(Code::tabs_warning(291), 2)));
    }

    #[test]
    fn listed_codes_only_suppress_themselves() {
        let tokens = tokenize("x = 1  # noqa: ET121, wt291\n").unwrap();
        let map = NoqaMap::from_tokens(&tokens);
        assert!(!map.is_blanket(1));
        assert!(map.suppresses(&diag(Code::tabs_error(121), 1)));
        assert!(map.suppresses(&diag(Code::tabs_warning(291), 1)));
        assert!(!map.suppresses(&diag(Code::tabs_error(126), 1)));
    }

    #[test]
    fn covers_line_looks_at_every_comment() {
        let tokens = tokenize("foo(  # noqa\n\ta)\n").unwrap();
        let map = NoqaMap::from_tokens(&tokens);
        assert!(map.covers_line(&tokens));
        let clean = tokenize("foo(a)  # fine\n").unwrap();
        assert!(!NoqaMap::from_tokens(&clean).covers_line(&clean));
    }
}
