//! File collection utilities

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::fs;

/// Collect lintable files under `paths`.
///
/// Directories are walked with gitignore filtering and only files whose
/// extension is in `extensions` are kept. Explicit file paths are always kept.
pub fn collect_all_files(
    paths: &[Utf8PathBuf],
    extensions: Option<&HashSet<String>>,
) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = fs::metadata(path)?;
        if metadata.is_file() {
            // Explicit file path: always include, regardless of gitignore
            files.push(path.clone());
            continue;
        }

        // Directory: walk with gitignore filtering
        let walker = WalkBuilder::new(path)
            .standard_filters(true) // enables gitignore, .git/info/exclude, global config
            .build();

        for result in walker {
            let entry = result?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let p = Utf8PathBuf::from_path_buf(entry.path().to_owned())
                .map_err(|_| anyhow::anyhow!("non-utf8 path: {}", entry.path().display()))?;
            if is_watched(&p, extensions) {
                files.push(p);
            }
        }
    }
    tracing::debug!("Collected {} file(s)", files.len());
    Ok(files)
}

fn is_watched(path: &Utf8Path, extensions: Option<&HashSet<String>>) -> bool {
    let Some(extensions) = extensions else {
        return true;
    };
    path.extension()
        .is_some_and(|ext| extensions.contains(&ext.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> HashSet<String> {
        ["py", "pyi"].into_iter().map(String::from).collect()
    }

    #[test]
    fn watches_python_sources_and_stubs() {
        let exts = python();
        assert!(is_watched(Utf8Path::new("pkg/mod.py"), Some(&exts)));
        assert!(is_watched(Utf8Path::new("pkg/mod.PYI"), Some(&exts)));
        assert!(!is_watched(Utf8Path::new("pkg/README.md"), Some(&exts)));
        assert!(!is_watched(Utf8Path::new("Makefile"), Some(&exts)));
    }

    #[test]
    fn no_extension_set_watches_everything() {
        assert!(is_watched(Utf8Path::new("Makefile"), None));
    }
}
