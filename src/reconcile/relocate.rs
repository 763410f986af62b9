// src/reconcile/relocate.rs

//! Copy-then-delete relocation with content verification.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use blake3::Hasher;
use tracing::debug;

/// Move `src` to `dst` without ever putting the only copy at risk.
///
/// The file is copied first and the source deleted only once the destination
/// is confirmed to hold identical bytes. A failed copy or a hash mismatch
/// leaves the source untouched.
pub fn relocate_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;

    let src_hash = hash_file(src)?;
    let dst_hash = hash_file(dst)?;
    if src_hash != dst_hash {
        bail!(
            "copy verification failed: {} and {} differ",
            src.display(),
            dst.display()
        );
    }

    fs::remove_file(src)
        .with_context(|| format!("removing relocated file {}", src.display()))?;

    debug!(
        src = %src.display(),
        dst = %dst.display(),
        "relocated output file"
    );

    Ok(())
}

/// Hash of a file's contents.
fn hash_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("opening {} for hashing", path.display()))?;

    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
