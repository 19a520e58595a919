//! The Markdown document being rewritten.

mod slug;

pub use slug::{rename_to_slug, slugify};

use anyhow::{Context, Result};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::storage::AssetDir;

/// One document: read once, rewritten in memory, written back once.
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    base: String,
    text: String,
}

impl Document {
    /// Read the document at `path` as UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read document {}", path.display()))?;
        let base = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("document has no file name: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            base,
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem; names the asset folder and fallback asset names.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Folder the document lives in.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// The asset folder for this document under `assets`.
    pub fn asset_dir(&self, assets: &str) -> AssetDir {
        AssetDir::new(self.dir(), assets, &self.base)
    }

    /// Rewrite the text in one pass: every occurrence of a URL in `urls` that has
    /// an entry in `local_refs` becomes that local reference. Returns the number
    /// of occurrences replaced.
    ///
    /// At each position the longest matching URL wins, so a URL that is a prefix
    /// of another URL in the list never rewrites part of the longer one. URLs
    /// without an entry are copied through unchanged.
    pub fn rewrite(&mut self, urls: &[String], local_refs: &HashMap<String, String>) -> usize {
        if local_refs.is_empty() {
            return 0;
        }
        let mut by_len: Vec<&str> = urls
            .iter()
            .map(String::as_str)
            .filter(|u| !u.is_empty())
            .collect();
        by_len.sort_by_key(|u| Reverse(u.len()));

        let mut out = String::with_capacity(self.text.len());
        let mut replaced = 0;
        let mut rest = self.text.as_str();
        'scan: while let Some(c) = rest.chars().next() {
            for url in &by_len {
                if rest.starts_with(url) {
                    match local_refs.get(*url) {
                        Some(local) => {
                            out.push_str(local);
                            replaced += 1;
                        }
                        None => out.push_str(url),
                    }
                    rest = &rest[url.len()..];
                    continue 'scan;
                }
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if replaced > 0 {
            self.text = out;
        }
        replaced
    }

    /// Write the text back to where it was read from.
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, &self.text)
            .with_context(|| format!("write document {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_base() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("trip.md");
        std::fs::write(&p, "hello").unwrap();
        let doc = Document::load(&p).unwrap();
        assert_eq!(doc.base(), "trip");
        assert_eq!(doc.text(), "hello");
        assert_eq!(doc.dir(), dir.path());
        assert_eq!(
            doc.asset_dir("assets").path(),
            dir.path().join("assets").join("trip")
        );
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Document::load(&dir.path().join("nope.md")).is_err());
    }

    fn refs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn doc_with(text: &str) -> (tempfile::TempDir, Document) {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("d.md");
        std::fs::write(&p, text).unwrap();
        let doc = Document::load(&p).unwrap();
        (dir, doc)
    }

    #[test]
    fn rewrite_all_occurrences() {
        let (_dir, mut doc) = doc_with(
            "![](https://x.test/a.png) text ![](https://x.test/a.png)\n<img src=\"https://x.test/a.png\">",
        );
        let urls = vec!["https://x.test/a.png".to_string()];
        let n = doc.rewrite(&urls, &refs(&[("https://x.test/a.png", "assets/d/a.png")]));
        assert_eq!(n, 3);
        assert!(!doc.text().contains("https://"));
        assert_eq!(doc.text().matches("assets/d/a.png").count(), 3);
    }

    #[test]
    fn rewrite_leaves_unresolved_urls() {
        let (_dir, mut doc) = doc_with("![](https://x.test/a.png) ![](https://x.test/b.png)");
        let urls = vec![
            "https://x.test/a.png".to_string(),
            "https://x.test/b.png".to_string(),
        ];
        let n = doc.rewrite(&urls, &refs(&[("https://x.test/b.png", "assets/d/b.png")]));
        assert_eq!(n, 1);
        assert_eq!(doc.text(), "![](https://x.test/a.png) ![](assets/d/b.png)");
    }

    #[test]
    fn rewrite_prefix_url_does_not_clobber_longer_url() {
        let (_dir, mut doc) = doc_with(
            "![](https://x.test/a.png) ![](https://x.test/a.png?size=large)",
        );
        let urls = vec![
            "https://x.test/a.png".to_string(),
            "https://x.test/a.png?size=large".to_string(),
        ];
        // Only the short URL resolved; the long one must survive intact.
        let n = doc.rewrite(&urls, &refs(&[("https://x.test/a.png", "assets/d/a.png")]));
        assert_eq!(n, 1);
        assert_eq!(
            doc.text(),
            "![](assets/d/a.png) ![](https://x.test/a.png?size=large)"
        );
    }

    #[test]
    fn rewrite_without_refs_keeps_text() {
        let (_dir, mut doc) = doc_with("![](https://x.test/a.png) ünïcödé");
        let before = doc.text().to_string();
        let urls = vec!["https://x.test/a.png".to_string()];
        assert_eq!(doc.rewrite(&urls, &HashMap::new()), 0);
        assert_eq!(doc.text(), before);
    }

    #[test]
    fn rewrite_preserves_multibyte_text() {
        let (_dir, mut doc) = doc_with("Ảnh: ![ảnh](https://x.test/a.png) — xong");
        let urls = vec!["https://x.test/a.png".to_string()];
        doc.rewrite(&urls, &refs(&[("https://x.test/a.png", "assets/d/a.png")]));
        assert_eq!(doc.text(), "Ảnh: ![ảnh](assets/d/a.png) — xong");
    }

    #[test]
    fn save_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("d.md");
        std::fs::write(&p, "![](https://x.test/a.png)").unwrap();
        let mut doc = Document::load(&p).unwrap();
        let urls = vec!["https://x.test/a.png".to_string()];
        doc.rewrite(&urls, &refs(&[("https://x.test/a.png", "assets/d/a.png")]));
        doc.save().unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "![](assets/d/a.png)");
    }
}
