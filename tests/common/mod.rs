#![allow(dead_code)]

//! Shared helpers for integration tests: small shell scripts standing in for
//! the real rendering engines.

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable shell script into `dir` and return its path.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!("#!/bin/sh\n{body}\n");
    fs::write(&path, script).expect("writing stub script");

    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("marking script executable");

    path
}

/// Stub engine that writes a small file to the path following `--svg`/`--png`,
/// honouring the real engines' argument contract.
pub const WRITE_OUTPUT_ENGINE: &str = r#"out=
prev=
for arg in "$@"; do
  case "$prev" in
    --svg|--png) out="$arg" ;;
  esac
  prev="$arg"
done
printf 'stub-render' > "$out"
"#;

/// Stub engine that ignores the requested output path and drops a file named
/// after the input stem into its own directory instead.
pub const STRAY_OUTPUT_ENGINE: &str = r#"ext=svg
input=
for arg in "$@"; do
  case "$arg" in
    --png) ext=png ;;
    --svg) ext=svg ;;
  esac
  input="$arg"
done
base=$(basename "$input")
stem=${base%.*}
dir=$(cd "$(dirname "$0")" && pwd)
printf 'stray-render' > "$dir/${stem}-stray.$ext"
"#;

/// Stub engine that exits cleanly without writing anything at all.
pub const SILENT_ENGINE: &str = "exit 0";

/// Stub engine that fails with a diagnostic.
pub const FAILING_ENGINE: &str = "echo boom >&2\nexit 3";
