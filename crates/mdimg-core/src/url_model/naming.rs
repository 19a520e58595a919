//! Synthesized asset names for URLs without a usable filename.

use super::content_type::extension_for_content_type;

/// Hands out `<base>-<n><ext>` names for one run.
///
/// The counter starts at 1 and is shared by every URL in the run; it only
/// advances when a name is actually handed out.
#[derive(Debug, Clone)]
pub struct FallbackNamer {
    base: String,
    next: u32,
}

impl FallbackNamer {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            next: 1,
        }
    }

    /// Returns the next name, choosing the extension from `content_type`.
    pub fn next_name(&mut self, content_type: Option<&str>) -> String {
        let ext = extension_for_content_type(content_type);
        let name = format!("{}-{}{}", self.base, self.next, ext);
        self.next += 1;
        name
    }
}
