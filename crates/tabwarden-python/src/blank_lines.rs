//! Whitespace checks for blank lines and line ends.

use regex::Regex;
use std::sync::LazyLock;
use tabwarden_abi::{BlankLinesIndent, CheckOptions, Diagnostic, Position};

use crate::codes;
use crate::tokenizer::expanded_width;

static LINE_PARTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)(.*?)([ \t]*)(\r\n|\n|\r)?$").unwrap());

struct LineParts<'a> {
    leading: &'a str,
    content: &'a str,
    trailing: &'a str,
}

fn split(line: &str) -> LineParts<'_> {
    let Some(caps) = LINE_PARTS_RE.captures(line) else {
        return LineParts {
            leading: "",
            content: line,
            trailing: "",
        };
    };
    let group = |i| caps.get(i).map_or("", |m| m.as_str());
    LineParts {
        leading: group(1),
        content: group(2),
        trailing: group(3),
    }
}

/// Leading whitespace of the nearest line in `lines` with content.
fn nearest_indent<'a>(lines: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    lines
        .map(split)
        .find(|parts| !parts.content.is_empty())
        .map(|parts| parts.leading)
}

/// The indentation a blank line at `index` should carry: the shallower of
/// its nearest non-blank neighbours, preferring the previous one on ties.
fn expected_indent<'a>(lines: &[&'a str], index: usize, indent_size: usize) -> &'a str {
    let previous = nearest_indent(lines[..index].iter().rev().copied());
    let next = nearest_indent(lines[index + 1..].iter().copied());
    match (previous, next) {
        (Some(prev), Some(next)) => {
            if expanded_width(next, indent_size) < expanded_width(prev, indent_size) {
                next
            } else {
                prev
            }
        }
        (Some(indent), None) | (None, Some(indent)) => indent,
        (None, None) => "",
    }
}

/// Check physical line `index` (0-based) of `lines`.
#[must_use]
pub fn check(lines: &[&str], index: usize, options: &CheckOptions) -> Option<Diagnostic> {
    let line = lines.get(index)?;
    let row = index + 1;
    let parts = split(line);

    if !parts.content.is_empty() {
        if parts.trailing.is_empty() {
            return None;
        }
        let col = parts.leading.chars().count() + parts.content.chars().count();
        return Some(Diagnostic::new(
            codes::TRAILING_WHITESPACE,
            Position::new(row, col),
            "trailing whitespace",
        ));
    }

    let empty = parts.leading.is_empty();
    match options.blank_lines_indent {
        BlankLinesIndent::Never if !empty => {
            return Some(Diagnostic::new(
                codes::BLANK_LINE_WHITESPACE,
                Position::new(row, 0),
                "blank line contains whitespace, but blank-lines-indent=never",
            ));
        }
        BlankLinesIndent::Never | BlankLinesIndent::Maybe if empty => return None,
        _ => {}
    }

    let expected = expected_indent(lines, index, options.indent_size);
    if parts.leading == expected {
        return None;
    }
    let message = if empty {
        "blank line lacks indentation, but blank-lines-indent=always"
    } else {
        "blank line contains unaligned whitespace"
    };
    Some(Diagnostic::new(
        codes::BLANK_LINE_WHITESPACE,
        Position::new(row, 0),
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(blank_lines_indent: BlankLinesIndent) -> CheckOptions {
        CheckOptions {
            blank_lines_indent,
            ..CheckOptions::default()
        }
    }

    fn run(lines: &[&str], mode: BlankLinesIndent) -> Vec<(usize, String)> {
        (0..lines.len())
            .filter_map(|i| check(lines, i, &options(mode)))
            .map(|d| (d.position.row, d.code.to_string()))
            .collect()
    }

    #[test]
    fn tab_after_unindented_line_is_unaligned() {
        let lines = ["def f():\n", "\t\n", "\treturn 1\n"];
        assert_eq!(run(&lines, BlankLinesIndent::Never), vec![(2, "WT293".into())]);
        assert_eq!(run(&lines, BlankLinesIndent::Maybe), vec![(2, "WT293".into())]);
        let d = check(&lines, 1, &options(BlankLinesIndent::Maybe)).unwrap();
        assert_eq!(d.message, "blank line contains unaligned whitespace");
    }

    #[test]
    fn aligned_whitespace_passes() {
        let lines = ["\tx = 1\n", "\t\n", "\ty = 2\n"];
        assert!(run(&lines, BlankLinesIndent::Maybe).is_empty());
        assert!(run(&lines, BlankLinesIndent::Always).is_empty());
    }

    #[test]
    fn never_rejects_any_whitespace() {
        let lines = ["\tx = 1\n", "\t\n", "\ty = 2\n"];
        let d = check(&lines, 1, &options(BlankLinesIndent::Never)).unwrap();
        assert_eq!(d.message, "blank line contains whitespace, but blank-lines-indent=never");
    }

    #[test]
    fn empty_lines_only_matter_under_always() {
        let lines = ["\tx = 1\n", "\n", "\ty = 2\n"];
        assert!(run(&lines, BlankLinesIndent::Maybe).is_empty());
        assert!(run(&lines, BlankLinesIndent::Never).is_empty());
        let d = check(&lines, 1, &options(BlankLinesIndent::Always)).unwrap();
        assert_eq!(d.code.to_string(), "WT293");
        assert_eq!(d.message, "blank line lacks indentation, but blank-lines-indent=always");

        let top_level = ["x = 1\n", "\n", "y = 2\n"];
        assert!(run(&top_level, BlankLinesIndent::Always).is_empty());
    }

    #[test]
    fn shallower_neighbour_wins_and_ties_prefer_previous() {
        let lines = ["\t\tx\n", "\t\n", "\ty\n"];
        assert!(run(&lines, BlankLinesIndent::Maybe).is_empty());
        let lines = ["\tx\n", "        \n", "\t\ty\n"];
        assert_eq!(run(&lines, BlankLinesIndent::Maybe), vec![(2, "WT293".into())]);
        let options = CheckOptions {
            indent_size: 8,
            ..options(BlankLinesIndent::Maybe)
        };
        assert!(check(&["        x\n", "        \n", "\ty\n"], 1, &options).is_none());
    }

    #[test]
    fn missing_neighbours_are_ignored() {
        assert_eq!(run(&["\n", "\tx\n"], BlankLinesIndent::Always).len(), 1);
        assert!(run(&["\tx\n", "\t\n"], BlankLinesIndent::Maybe).is_empty());
        assert_eq!(run(&["  \n"], BlankLinesIndent::Maybe), vec![(1, "WT293".into())]);
    }

    #[test]
    fn trailing_whitespace_is_reported_after_content() {
        let lines = ["x = 1  \r\n", "\ty\t\n", "z\n"];
        let found: Vec<_> = (0..3)
            .filter_map(|i| check(&lines, i, &CheckOptions::default()))
            .map(|d| (d.code.to_string(), d.position))
            .collect();
        assert_eq!(
            found,
            vec![
                ("WT291".to_string(), Position::new(1, 5)),
                ("WT291".to_string(), Position::new(2, 2)),
            ]
        );
    }
}
