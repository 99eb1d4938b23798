//! File-level indentation consistency checks in the pycodestyle style.

use memchr::memchr_iter;
use tabwarden_abi::{Diagnostic, Diagnostics, Position};

use crate::codes;

/// Report files that indent blocks with both tabs and spaces (E101) and the
/// first space indentation step that is not a multiple of `indent_size` (E111).
///
/// `lines` holds the row and text of the first physical line of every
/// statement. Continuation lines and string bodies must not be passed in.
pub fn check_block_indentation<'a>(
    lines: impl IntoIterator<Item = (usize, &'a str)>,
    indent_size: usize,
    diags: &mut Diagnostics,
) {
    let mut first_tabs: Option<usize> = None;
    let mut first_spaces: Option<usize> = None;
    let mut uneven_step: Option<usize> = None;
    let mut indent_stack: Vec<usize> = Vec::new();

    for (row, line) in lines {
        // Skip blank lines
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with('\t') {
            first_tabs.get_or_insert(row);
            continue;
        }
        if !line.starts_with(' ') {
            indent_stack.clear();
            continue;
        }
        first_spaces.get_or_insert(row);

        let indent = count_leading_spaces(line);
        while indent_stack.last().is_some_and(|&level| level > indent) {
            indent_stack.pop();
        }
        let last = indent_stack.last().copied().unwrap_or(0);
        if indent > last {
            // Indentation increased
            if (indent - last) % indent_size.max(1) != 0 {
                uneven_step.get_or_insert(row);
            }
            indent_stack.push(indent);
        }
    }

    if let (Some(tabs), Some(spaces)) = (first_tabs, first_spaces) {
        diags.push(Diagnostic::new(
            codes::MIXED_FILE_INDENTATION,
            Position::new(tabs.max(spaces), 0),
            "indentation contains mixed spaces and tabs",
        ));
    }

    if let Some(row) = uneven_step {
        diags.push(Diagnostic::new(
            codes::INDENT_NOT_MULTIPLE,
            Position::new(row, 0),
            format!("indentation is not a multiple of {indent_size}"),
        ));
    }
}

/// Raw per-line variant for sources that could not be tokenized.
pub fn check_indentation_consistency(source: &str, indent_size: usize, diags: &mut Diagnostics) {
    let bytes = source.as_bytes();
    let mut line_start = 0;
    let mut lines = Vec::new();

    let ends = memchr_iter(b'\n', bytes).chain(std::iter::once(bytes.len()));
    for nl in ends {
        if nl == bytes.len() && line_start == nl {
            break;
        }
        lines.push((lines.len() + 1, &source[line_start..nl]));
        line_start = nl + 1;
    }

    check_block_indentation(lines, indent_size, diags);
}

fn count_leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
