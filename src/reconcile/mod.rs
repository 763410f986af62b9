// src/reconcile/mod.rs

//! Recovery of engine output that landed somewhere other than the requested
//! path.
//!
//! One engine variant intermittently ignores the absolute output path it is
//! given and writes relative to its working directory instead. After a
//! zero-exit run whose expected file is missing, we search a fixed list of
//! plausible directories for a recently-modified file with a matching name
//! and move it into place.
//!
//! This is a heuristic, not a guarantee. Files that fail either the name
//! filter or the recency filter are never touched, so unrelated files cannot
//! be corrupted by a recovery attempt.

pub mod relocate;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use tracing::{debug, info, warn};

pub use relocate::relocate_file;

/// Ordered directories a stray output may have landed in.
#[derive(Debug, Clone)]
pub struct SearchDirs {
    dirs: Vec<PathBuf>,
}

impl SearchDirs {
    /// Standard candidate list: current directory, home directory, the
    /// tool's own directory, the project root, and the engine's directory
    /// under the project root.
    pub fn standard(tool_dir: &Path, project_root: &Path, engine_dir: &Path) -> Self {
        let mut dirs = vec![PathBuf::from(".")];
        if let Some(home) = home_dir() {
            dirs.push(home);
        }
        dirs.push(tool_dir.to_path_buf());
        dirs.push(project_root.to_path_buf());
        dirs.push(engine_dir.to_path_buf());
        Self { dirs }
    }

    /// Explicit candidate list; lets tests keep the search hermetic.
    pub fn explicit(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(|p| p.as_path())
    }
}

/// Where the reconciler found the output, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Already at the expected path; nothing to do.
    AlreadyInPlace,
    /// A stray file was relocated into the expected path.
    Relocated { from: PathBuf },
    /// No acceptable candidate exists anywhere; the file is simply missing.
    Missing,
}

/// Try to make `expected` exist after a successful exit left it missing.
///
/// `preferred` is the engine's own working-directory request path, checked
/// before the directory sweep when given. `stem` is the input file's base
/// name and `launched_at` the moment the subprocess was started; only files
/// modified at or after it are eligible for relocation.
pub fn reconcile_output(
    expected: &Path,
    preferred: Option<&Path>,
    stem: &str,
    extension: &str,
    launched_at: SystemTime,
    search: &SearchDirs,
) -> Result<Reconciliation> {
    if expected.exists() {
        return Ok(Reconciliation::AlreadyInPlace);
    }

    if let Some(candidate) = preferred {
        if candidate.is_file() {
            info!(
                from = %candidate.display(),
                to = %expected.display(),
                "recovering working-directory output"
            );
            relocate_file(candidate, expected)?;
            return Ok(Reconciliation::Relocated {
                from: candidate.to_path_buf(),
            });
        }
    }

    let matcher = stray_matcher(stem, extension)?;

    for dir in search.iter() {
        if !dir.is_dir() {
            continue;
        }
        match first_recent_match(dir, &matcher, launched_at) {
            Ok(Some(found)) => {
                info!(
                    from = %found.display(),
                    to = %expected.display(),
                    "recovering stray output"
                );
                relocate_file(&found, expected)?;
                return Ok(Reconciliation::Relocated { from: found });
            }
            Ok(None) => {}
            Err(err) => {
                warn!(
                    dir = %dir.display(),
                    error = %err,
                    "skipping unreadable search directory"
                );
            }
        }
    }

    Ok(Reconciliation::Missing)
}

/// Glob accepting any file name containing the input stem with the right
/// extension, e.g. `*page*.svg`.
fn stray_matcher(stem: &str, extension: &str) -> Result<GlobMatcher> {
    let pattern = format!("*{stem}*.{extension}");
    let glob = Glob::new(&pattern)
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// First directory entry passing both the name glob and the recency filter.
///
/// Plain `read_dir` order; the heuristic promises no particular pick when
/// several files qualify.
fn first_recent_match(
    dir: &Path,
    matcher: &GlobMatcher,
    launched_at: SystemTime,
) -> Result<Option<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        if !matcher.is_match(Path::new(name)) {
            continue;
        }

        match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(mtime) if mtime >= launched_at => return Ok(Some(path)),
            Ok(_) => {
                debug!(path = %path.display(), "name matches but file predates the run");
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "could not read modification time"
                );
            }
        }
    }

    Ok(None)
}

/// Home directory from the environment.
fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var).map(PathBuf::from)
}
