//! Remote image reference extraction.
//!
//! Recognizes Markdown images (`![alt](https://...)`) and HTML `<img>` tags with
//! a quoted `http(s)` `src`. All Markdown matches come first, then all HTML
//! matches; duplicates are dropped keeping the first occurrence.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\((https?://[^)]+)\)").unwrap());

static HTML_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src=["'](https?://[^"']+)["']"#).unwrap());

/// Returns the distinct remote image URLs in `text`, in first-seen order.
pub fn image_urls(text: &str) -> Vec<String> {
    let markdown = MARKDOWN_IMAGE.captures_iter(text);
    let html = HTML_IMAGE.captures_iter(text);

    let mut seen = HashSet::new();
    markdown
        .chain(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}
