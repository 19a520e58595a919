//! Filename extraction from URL path.

/// Path part of `url` exactly as written: after the authority, before any
/// query or fragment. Nothing is percent-encoded or decoded.
fn raw_path(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(|c| c == '?' || c == '#').unwrap_or(rest.len());
    let rest = &rest[..end];
    rest.find('/').map(|i| &rest[i..])
}

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
/// The segment is taken from the URL text as written, so spaces and
/// non-ASCII characters come through unchanged and a `%` only appears when
/// the author wrote one.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    url::Url::parse(url).ok()?;
    let segment = raw_path(url)?
        .split('/')
        .filter(|s| !s.is_empty())
        .last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Returns the URL's last path segment if it is usable as-is for an asset filename.
///
/// The segment is rejected when it contains a percent-encoding marker, is longer
/// than `max_len` characters, or has no `.` (no apparent extension).
pub fn resolve_filename(url: &str, max_len: usize) -> Option<String> {
    let name = filename_from_url_path(url)?;
    if name.contains('%') || name.chars().count() > max_len {
        return None;
    }
    if !name.contains('.') {
        return None;
    }
    Some(name)
}
