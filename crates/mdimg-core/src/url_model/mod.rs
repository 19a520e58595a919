//! URL modeling and filename derivation.
//!
//! Decides the local filename for an image: the URL's last path segment when
//! it looks like a plain filename, otherwise a synthesized
//! `<base>-<n><ext>` name chosen after the fetch from the response's
//! content type.

mod content_type;
mod naming;
mod path;

pub use content_type::{extension_for_content_type, GENERIC_EXTENSION};
pub use naming::FallbackNamer;
pub use path::{filename_from_url_path, resolve_filename};

/// Outcome of resolving a URL's filename before any network access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedName {
    /// The URL's last path segment is used as-is.
    Known(String),
    /// No usable name in the URL; pick one from the response content type.
    NeedsContentType,
}

/// Resolves a URL into a known filename or a deferred content-type name.
///
/// # Examples
///
/// - `resolve("https://example.com/cat.png", 80)` → `Known("cat.png")`
/// - `resolve("https://example.com/render?id=7", 80)` → `NeedsContentType`
pub fn resolve(url: &str, max_len: usize) -> ResolvedName {
    match resolve_filename(url, max_len) {
        Some(name) => ResolvedName::Known(name),
        None => ResolvedName::NeedsContentType,
    }
}
