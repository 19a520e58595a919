//! `mdimg <document>` – localize the document's remote images.

use anyhow::Result;
use mdimg_core::config::MdimgConfig;
use mdimg_core::document::{rename_to_slug, Document};
use mdimg_core::fetch::CurlFetcher;
use mdimg_core::pipeline::{localize, UrlOutcome};
use std::path::{Path, PathBuf};

/// Expand `~` and make `arg` absolute against `cwd`.
pub(crate) fn document_path(arg: &str, cwd: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(arg).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    }
}

/// Resolve the document path, slug-rename it if asked, and check it exists.
pub(crate) fn prepare_document(arg: &str, cwd: &Path, rename: bool) -> Result<PathBuf> {
    let mut path = document_path(arg, cwd);

    if rename && path.is_file() {
        let renamed = rename_to_slug(&path)?;
        if renamed != path {
            println!(
                "renamed: {} -> {}",
                file_name(&path),
                file_name(&renamed)
            );
        }
        path = renamed;
    }

    if !path.is_file() {
        anyhow::bail!("document not found: {}", path.display());
    }
    Ok(path)
}

pub fn run_localize(arg: &str, cwd: &Path, rename: bool, cfg: &MdimgConfig) -> Result<()> {
    let path = prepare_document(arg, cwd, rename)?;
    let mut doc = Document::load(&path)?;

    let fetcher = CurlFetcher::new(cfg.fetch_timeout()).with_user_agent(cfg.user_agent.clone());
    let pause_secs = cfg.failure_pause_secs;

    let report = localize(&mut doc, &fetcher, cfg, |url, outcome| {
        print_outcome(url, outcome, pause_secs)
    })?;

    match &report.assets_dir {
        None => println!(
            "skipped {}: no remote images (or all already local)",
            file_name(doc.path())
        ),
        Some(dir) => {
            println!(
                "{} downloaded, {} already present, {} failed",
                report.downloaded(),
                report.cached(),
                report.failed()
            );
            println!("images saved in {}", dir.display());
            println!("updated image paths in {}", doc.path().display());
        }
    }
    Ok(())
}

fn print_outcome(url: &str, outcome: &UrlOutcome, pause_secs: u64) {
    match outcome {
        UrlOutcome::Cached { filename } => println!("already have {filename}, skipping"),
        UrlOutcome::Downloaded { filename, bytes } => {
            println!("downloaded {url} -> {filename} ({bytes} bytes)")
        }
        UrlOutcome::Reused { filename } => println!("kept existing {filename} for {url}"),
        UrlOutcome::Failed { error } => {
            if pause_secs > 0 {
                eprintln!("failed to download {url}: {error} (waiting {pause_secs}s)")
            } else {
                eprintln!("failed to download {url}: {error}")
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
