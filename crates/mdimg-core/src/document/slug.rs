//! Slug normalization of document file names.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase ASCII slug: NFKD, combining marks dropped, runs of anything
/// outside `[a-z0-9]` collapsed to `-`, no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.nfkd().filter(|c| !is_combining_mark(*c)) {
        for c in c.to_lowercase() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push(c);
            } else {
                pending_dash = true;
            }
        }
    }
    out
}

/// Renames `path` so its stem is a slug, keeping the extension.
///
/// Returns the path to use from now on (unchanged if the stem is already a
/// slug or slugifies to nothing). Fails without touching anything if a file
/// already exists under the slug name.
pub fn rename_to_slug(path: &Path) -> Result<PathBuf> {
    let stem = match path.file_stem().and_then(|s| s.to_str()) {
        Some(s) => s,
        None => return Ok(path.to_path_buf()),
    };
    let slug = slugify(stem);
    if slug.is_empty() || slug == stem {
        return Ok(path.to_path_buf());
    }

    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", slug, ext),
        None => slug,
    };
    let new_path = path.with_file_name(file_name);
    if new_path.exists() {
        bail!(
            "cannot rename {} to {}: target already exists",
            path.display(),
            new_path.display()
        );
    }
    std::fs::rename(path, &new_path)
        .with_context(|| format!("rename {} to {}", path.display(), new_path.display()))?;
    tracing::info!(from = %path.display(), to = %new_path.display(), "renamed document");
    Ok(new_path)
}
