// src/discover.rs

//! Locating the HTML inputs to render.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// True if the path has an `.html` extension, compared case-insensitively.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Collect the HTML files under `input`.
///
/// A single file is returned as-is when it has an `.html` extension and
/// skipped otherwise. A directory is walked recursively. The result is
/// sorted by path so runs are deterministic.
///
/// Zero matches is not an error here; the caller decides what an empty
/// input set means.
pub fn find_html_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        if is_html_file(input) {
            return vec![input.to_path_buf()];
        }
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_html_file(path))
        .collect();

    files.sort();
    files
}
