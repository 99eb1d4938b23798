//! Output formatting and diagnostic display

use serde::Serialize;
use tabwarden_abi::Diagnostic;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SerializableDiagnostic {
    pub path: String,
    pub line: usize,
    /// 1-based
    pub col: usize,
    pub code: String,
    pub message: String,
}

impl SerializableDiagnostic {
    #[must_use]
    pub fn new(path: &str, diag: &Diagnostic) -> Self {
        Self {
            path: path.to_string(),
            line: diag.position.row,
            col: diag.position.col + 1,
            code: diag.code.to_string(),
            message: diag.message.clone(),
        }
    }
}

/// `path:row:col: CODE message` with a 1-based column.
#[must_use]
pub fn format_diagnostic(path: &str, diag: &Diagnostic) -> String {
    format!(
        "{path}:{line}:{col}: {code} {msg}",
        line = diag.position.row,
        col = diag.position.col + 1,
        code = diag.code,
        msg = diag.message
    )
}

pub fn print_diagnostic(path: &str, diag: &Diagnostic) {
    println!("{}", format_diagnostic(path, diag));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabwarden_abi::{Code, Position};

    fn sample() -> Diagnostic {
        Diagnostic::new(
            Code::tabs_error(126),
            Position::new(4, 0),
            "too many tabs",
        )
    }

    #[test]
    fn human_format_uses_one_based_columns() {
        assert_eq!(
            format_diagnostic("pkg/mod.py", &sample()),
            "pkg/mod.py:4:1: ET126 too many tabs"
        );
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(SerializableDiagnostic::new("a.py", &sample())).unwrap();
        assert_eq!(json["path"], "a.py");
        assert_eq!(json["line"], 4);
        assert_eq!(json["col"], 1);
        assert_eq!(json["code"], "ET126");
        assert_eq!(json["message"], "too many tabs");
    }
}
