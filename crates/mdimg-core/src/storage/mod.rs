//! Asset files on disk.
//!
//! An asset counts as present only when it exists with a non-zero size.
//! New assets are written to `<name>.part` and renamed into place, so an
//! interrupted write never leaves a truncated file under the final name.

use crate::fetch::FetchError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `cat.png` → `cat.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// True if `path` is a regular file with at least one byte.
pub fn is_present(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Write `bytes` to `final_path` via a `.part` file and rename.
pub fn write_atomic(final_path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(final_path);
    let result = (|| {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, final_path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// What `ensure_asset` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Asset was already present; the fetch closure was not called.
    Present,
    /// Bytes were fetched and written.
    Written { bytes: u64 },
    /// Bytes were fetched, but the asset became present before the write; left untouched.
    Raced,
}

#[derive(Debug, Error)]
pub enum EnsureError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Make sure `path` holds an asset, calling `fetch` only when it does not.
///
/// Idempotent: repeated calls after a successful one return `Present` without
/// fetching. Existing non-empty files are never overwritten.
pub fn ensure_asset<F>(path: &Path, fetch: F) -> Result<EnsureOutcome, EnsureError>
where
    F: FnOnce() -> Result<Vec<u8>, FetchError>,
{
    if is_present(path) {
        return Ok(EnsureOutcome::Present);
    }

    let bytes = fetch()?;

    if is_present(path) {
        tracing::debug!(path = %path.display(), "asset appeared during fetch, keeping it");
        return Ok(EnsureOutcome::Raced);
    }

    write_atomic(path, &bytes).map_err(|source| EnsureError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(EnsureOutcome::Written {
        bytes: bytes.len() as u64,
    })
}

/// The per-document asset folder: `<doc-dir>/<assets>/<base>/`.
#[derive(Debug, Clone)]
pub struct AssetDir {
    dir: PathBuf,
    rel_prefix: String,
}

impl AssetDir {
    /// `doc_dir` is the folder containing the document; `assets` the sub-folder name; `base` the document stem.
    pub fn new(doc_dir: &Path, assets: &str, base: &str) -> Self {
        Self {
            dir: doc_dir.join(assets).join(base),
            rel_prefix: format!("{}/{}", assets, base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Absolute location of an asset.
    pub fn file(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// The reference written into the document: `<assets>/<base>/<filename>`.
    pub fn local_ref(&self, filename: &str) -> String {
        format!("{}/{}", self.rel_prefix, filename)
    }

    pub fn create(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }
}
