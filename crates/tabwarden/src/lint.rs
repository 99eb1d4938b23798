//! Lint command implementation

use anyhow::Result;
use camino::Utf8PathBuf;
use std::collections::HashSet;
use std::fs;
use tabwarden_abi::Diagnostic;
use tabwarden_core::Source;

use crate::cli::{LintArgs, OutputFormat};
use crate::config::load_config;
use crate::files::collect_all_files;
use crate::output::{SerializableDiagnostic, print_diagnostic};
use crate::warden::init_warden;

/// Lint every file under `args.paths`, returning deduplicated findings in
/// file order.
pub fn lint_paths(args: &LintArgs) -> Result<Vec<(Utf8PathBuf, Diagnostic)>> {
    let mut warden = init_warden(args.options.clone(), args.config.as_ref())?;
    let extensions = warden.watched_extensions();
    let files = collect_all_files(&args.paths, extensions.as_ref())?;

    let mut findings = Vec::new();
    let mut seen = HashSet::new();
    for path in files {
        let text = fs::read_to_string(&path)?;
        let source = Source {
            path: path.as_path(),
            text: &text,
        };
        for diag in warden.enforce(&[source]) {
            let key = (path.clone(), diag.position, diag.code, diag.message.clone());
            if !seen.insert(key) {
                continue;
            }
            findings.push((path.clone(), diag));
        }
    }
    Ok(findings)
}

pub fn run_once(args: &LintArgs) -> Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let format = if args.json {
        OutputFormat::Json
    } else {
        cfg.format.unwrap_or_default()
    };

    let findings = lint_paths(args)?;

    match format {
        OutputFormat::Human => {
            for (path, diag) in &findings {
                print_diagnostic(path.as_str(), diag);
            }
        }
        OutputFormat::Json => {
            let json_out: Vec<SerializableDiagnostic> = findings
                .iter()
                .map(|(path, diag)| SerializableDiagnostic::new(path.as_str(), diag))
                .collect();
            println!("{}", serde_json::to_string_pretty(&json_out)?);
        }
    }

    if !findings.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
