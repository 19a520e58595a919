//! File extension from a `Content-Type` header value.

/// Extension used when the content type is missing or not a known image type.
pub const GENERIC_EXTENSION: &str = ".img";

/// Maps a `Content-Type` value to a file extension (with leading dot).
///
/// Matching is a case-sensitive substring test, checked in the order
/// jpeg, png, webp, gif.
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let ct = match content_type {
        Some(ct) if !ct.is_empty() => ct,
        _ => return GENERIC_EXTENSION,
    };
    const TABLE: [(&str, &str); 4] = [
        ("jpeg", ".jpg"),
        ("png", ".png"),
        ("webp", ".webp"),
        ("gif", ".gif"),
    ];
    TABLE
        .iter()
        .find(|(needle, _)| ct.contains(needle))
        .map(|(_, ext)| *ext)
        .unwrap_or(GENERIC_EXTENSION)
}
