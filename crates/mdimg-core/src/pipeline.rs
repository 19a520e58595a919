//! Localize one document: extract image URLs, materialize each asset, rewrite
//! the document once at the end.
//!
//! URLs are handled one at a time in first-seen order. A failed fetch is
//! reported, followed by a fixed pause, and the URL keeps its remote form.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::MdimgConfig;
use crate::document::Document;
use crate::extract;
use crate::fetch::{FetchError, Fetcher};
use crate::storage::{self, AssetDir, EnsureError, EnsureOutcome};
use crate::url_model::{self, FallbackNamer, ResolvedName};

/// What happened to one URL.
#[derive(Debug)]
pub enum UrlOutcome {
    /// Asset was already on disk; no request made.
    Cached { filename: String },
    /// Fetched and written.
    Downloaded { filename: String, bytes: u64 },
    /// Fetched, but an asset with that name already existed and was kept.
    Reused { filename: String },
    /// Fetch failed; the document keeps the remote URL.
    Failed { error: FetchError },
}

impl UrlOutcome {
    /// Local filename, unless the fetch failed.
    pub fn filename(&self) -> Option<&str> {
        match self {
            UrlOutcome::Cached { filename }
            | UrlOutcome::Downloaded { filename, .. }
            | UrlOutcome::Reused { filename } => Some(filename),
            UrlOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UrlOutcome::Failed { .. })
    }
}

/// Summary of one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Asset folder, or `None` when the document had no remote images.
    pub assets_dir: Option<PathBuf>,
    /// Every distinct URL in first-seen order with its outcome.
    pub outcomes: Vec<(String, UrlOutcome)>,
    /// Occurrences rewritten in the document text.
    pub replaced: usize,
}

impl RunReport {
    /// True when the document had nothing to localize.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_failed()).count()
    }

    pub fn downloaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, UrlOutcome::Downloaded { .. }))
            .count()
    }

    pub fn cached(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, UrlOutcome::Cached { .. }))
            .count()
    }
}

/// Localize every remote image in `doc`.
///
/// `observe` is called once per URL as soon as its outcome is known (before
/// the failure pause), so callers can report progress live.
///
/// With no remote images nothing is created or written and an empty report is
/// returned. Otherwise the asset folder is created and the document is saved
/// once at the end, however many URLs failed.
pub fn localize<F, O>(
    doc: &mut Document,
    fetcher: &F,
    cfg: &MdimgConfig,
    mut observe: O,
) -> Result<RunReport>
where
    F: Fetcher + ?Sized,
    O: FnMut(&str, &UrlOutcome),
{
    let urls = extract::image_urls(doc.text());
    if urls.is_empty() {
        tracing::info!(document = %doc.path().display(), "no remote images");
        return Ok(RunReport::default());
    }
    tracing::info!(
        document = %doc.path().display(),
        count = urls.len(),
        "found remote images"
    );

    let assets = doc.asset_dir(&cfg.assets_dir);
    assets
        .create()
        .with_context(|| format!("create asset dir {}", assets.path().display()))?;

    let mut namer = FallbackNamer::new(doc.base());
    let mut local_refs: HashMap<String, String> = HashMap::new();
    let mut outcomes = Vec::with_capacity(urls.len());

    for url in &urls {
        let outcome = materialize(url, fetcher, &assets, &mut namer, cfg.max_filename_len)?;
        observe(url.as_str(), &outcome);

        match outcome.filename() {
            Some(filename) => {
                tracing::debug!(url = %url, filename, "resolved");
                local_refs.insert(url.clone(), assets.local_ref(filename));
            }
            None => {
                let pause = cfg.failure_pause();
                if let UrlOutcome::Failed { error } = &outcome {
                    tracing::warn!(
                        url = %url,
                        error = %error,
                        timeout = error.is_timeout(),
                        "fetch failed, pausing {:?}",
                        pause
                    );
                }
                if !pause.is_zero() {
                    std::thread::sleep(pause);
                }
            }
        }
        outcomes.push((url.clone(), outcome));
    }

    let replaced = doc.rewrite(&urls, &local_refs);
    doc.save()?;
    tracing::info!(
        document = %doc.path().display(),
        replaced,
        resolved = local_refs.len(),
        failed = urls.len() - local_refs.len(),
        "document updated"
    );

    Ok(RunReport {
        assets_dir: Some(assets.path().to_path_buf()),
        outcomes,
        replaced,
    })
}

/// Decide the filename for `url` and make sure its asset exists.
///
/// Fetch failures become `UrlOutcome::Failed`; only disk errors are returned as `Err`.
fn materialize<F>(
    url: &str,
    fetcher: &F,
    assets: &AssetDir,
    namer: &mut FallbackNamer,
    max_filename_len: usize,
) -> Result<UrlOutcome>
where
    F: Fetcher + ?Sized,
{
    match url_model::resolve(url, max_filename_len) {
        ResolvedName::Known(filename) => {
            let path = assets.file(&filename);
            match storage::ensure_asset(&path, || fetcher.fetch(url).map(|r| r.body)) {
                Ok(EnsureOutcome::Present) => Ok(UrlOutcome::Cached { filename }),
                Ok(EnsureOutcome::Written { bytes }) => {
                    Ok(UrlOutcome::Downloaded { filename, bytes })
                }
                Ok(EnsureOutcome::Raced) => Ok(UrlOutcome::Reused { filename }),
                Err(EnsureError::Fetch(error)) => Ok(UrlOutcome::Failed { error }),
                Err(e) => Err(e.into()),
            }
        }
        ResolvedName::NeedsContentType => {
            let response = match fetcher.fetch(url) {
                Ok(r) => r,
                Err(error) => return Ok(UrlOutcome::Failed { error }),
            };
            let filename = namer.next_name(response.content_type.as_deref());
            let path = assets.file(&filename);
            let body = response.body;
            match storage::ensure_asset(&path, move || Ok(body))? {
                EnsureOutcome::Written { bytes } => Ok(UrlOutcome::Downloaded { filename, bytes }),
                EnsureOutcome::Present | EnsureOutcome::Raced => {
                    Ok(UrlOutcome::Reused { filename })
                }
            }
        }
    }
}
