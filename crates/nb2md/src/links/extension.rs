//! Renaming of cross-document links from the notebook extension to the converted one.

use super::scanner::rewrite_text;
use super::url::{has_scheme, UrlParts};

/// Rewrites `<path>.<source>` links to `<path>.<output>`.
///
/// Applies to Markdown links, Markdown images and HTML attributes alike.
/// Query and fragment are preserved. URLs carrying a scheme are left alone:
/// `http://example.com/a.ipynb` names a remote notebook, not a sibling.
///
/// # Example
///
/// ```
/// use nb2md::links::ExtensionRename;
///
/// let rename = ExtensionRename::new("ipynb", "md");
/// assert_eq!(rename.rename("sub/b.ipynb#intro").as_deref(), Some("sub/b.md#intro"));
/// assert_eq!(rename.rename("img/plot.png"), None);
/// ```
#[derive(Debug, Clone)]
pub struct ExtensionRename {
    source_suffix: String,
    output_suffix: String,
}

impl ExtensionRename {
    /// Create a rename pass. Extensions are given without the leading dot.
    pub fn new(source_extension: &str, output_extension: &str) -> Self {
        Self {
            source_suffix: format!(".{}", source_extension.trim_start_matches('.')),
            output_suffix: format!(".{}", output_extension.trim_start_matches('.')),
        }
    }

    /// Returns true if the URL names a document with the source extension.
    pub fn applies_to(&self, url: &str) -> bool {
        if has_scheme(url) {
            return false;
        }
        let path = UrlParts::split(url).path;
        path.len() > self.source_suffix.len()
            && path.ends_with(&self.source_suffix)
            && !path.ends_with(&format!("/{}", self.source_suffix))
    }

    /// Rename the extension of a single URL, or `None` if it does not apply.
    pub fn rename(&self, url: &str) -> Option<String> {
        if !self.applies_to(url) {
            return None;
        }
        let parts = UrlParts::split(url);
        let stem = &parts.path[..parts.path.len() - self.source_suffix.len()];
        Some(parts.with_path(&format!("{}{}", stem, self.output_suffix)))
    }

    /// Run the rename over a whole text as a stand-alone pass.
    ///
    /// Idempotent: renamed links no longer end with the source extension.
    pub fn rename_extensions(&self, text: &str) -> String {
        rewrite_text(text, |occurrence| self.rename(occurrence.url))
    }
}
