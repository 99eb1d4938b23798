use std::fs;
use tabwarden_abi::{BlankLinesIndent, CheckOptions, ContinuationStyle, IndentStyle, Position};
use tabwarden_python::{lint_source, lint_source_with_options};

fn sandbox(name: &str) -> String {
    fs::read_to_string(format!("../../sandbox/python/{name}"))
        .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
}

fn tabs_options() -> CheckOptions {
    CheckOptions {
        use_flake8_tabs: true,
        use_pycodestyle_indent: false,
        ..CheckOptions::default()
    }
}

fn found(diags: &[tabwarden_abi::Diagnostic]) -> Vec<(String, usize)> {
    diags
        .iter()
        .map(|d| (d.code.to_string(), d.position.row))
        .collect()
}

#[test]
fn test_clean_tab_indented_file() {
    let src = sandbox("01_clean_tabs.py");
    let options = CheckOptions {
        indent_style: IndentStyle::Tab,
        continuation_style: ContinuationStyle::Hanging,
        ..tabs_options()
    };
    let diags = lint_source_with_options(&src, &options);
    assert!(diags.is_empty(), "Expected no diagnostics, got {diags:?}");
    assert!(lint_source(&src).is_empty());
}

#[test]
fn test_bad_continuation_lines() {
    let src = sandbox("02_bad_continuation.py");
    let diags = lint_source_with_options(&src, &tabs_options());
    assert_eq!(
        found(&diags),
        vec![("ET126".to_string(), 4), ("ET122".to_string(), 9)]
    );
    assert!(diags[0].message.contains("call line"));
    assert!(diags[1].message.contains("expression is not indented"));
}

#[test]
fn test_space_indented_block_under_tab_style() {
    let src = sandbox("03_space_block.py");
    let options = CheckOptions {
        indent_style: IndentStyle::Tab,
        ..CheckOptions::default()
    };
    let diags = lint_source_with_options(&src, &options);
    assert_eq!(
        found(&diags),
        vec![("ET191".to_string(), 2), ("E101".to_string(), 6)]
    );
}

#[test]
fn test_blank_line_whitespace() {
    let src = sandbox("04_blank_lines.py");
    let diags = lint_source(&src);
    assert_eq!(diags.len(), 2, "got {diags:?}");
    assert_eq!(diags[0].code.to_string(), "WT291");
    assert_eq!(diags[0].position, Position::new(4, 9));
    assert_eq!(diags[1].code.to_string(), "WT293");
    assert_eq!(diags[1].position, Position::new(6, 0));

    let options = CheckOptions {
        blank_lines_indent: BlankLinesIndent::Never,
        ..CheckOptions::default()
    };
    let diags = lint_source_with_options(&src, &options);
    assert_eq!(
        found(&diags),
        vec![
            ("WT293".to_string(), 3),
            ("WT291".to_string(), 4),
            ("WT293".to_string(), 6)
        ]
    );
}

#[test]
fn test_aligned_continuation_styles() {
    let src = sandbox("05_aligned.py");
    assert!(lint_source_with_options(&src, &tabs_options()).is_empty());

    let aligned = CheckOptions {
        continuation_style: ContinuationStyle::Aligned,
        ..tabs_options()
    };
    assert!(lint_source_with_options(&src, &aligned).is_empty());

    let hanging = CheckOptions {
        continuation_style: ContinuationStyle::Hanging,
        ..tabs_options()
    };
    let diags = lint_source_with_options(&src, &hanging);
    assert_eq!(found(&diags), vec![("WT113".to_string(), 2)]);
    assert_eq!(diags[0].position, Position::new(2, 16));
}

#[test]
fn test_unterminated_string_reports_tokenize_error() {
    let src = sandbox("06_unterminated.py");
    let diags = lint_source_with_options(&src, &tabs_options());
    assert_eq!(found(&diags), vec![("E902".to_string(), 1)]);
    assert_eq!(diags[0].position, Position::new(1, 6));
}
