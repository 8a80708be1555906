//! URL eligibility for path remapping.

use super::url::{has_scheme, UrlParts};

/// Outcome of classifying a single URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlClass {
    /// Leave the URL exactly as written.
    PassThrough,
    /// Local relative URL whose path must be remapped.
    RewriteCandidate,
}

/// Decides which URLs of one converted document may be remapped.
///
/// The only per-document input is the generated-asset prefix: links into
/// `<document-base-name>_files/` were written by the converter next to the
/// output and already resolve correctly.
///
/// # Example
///
/// ```
/// use nb2md::links::{UrlClass, UrlClassifier};
///
/// let classifier = UrlClassifier::for_document("analysis", "_files/");
/// assert_eq!(classifier.classify("img/plot.png"), UrlClass::RewriteCandidate);
/// assert_eq!(classifier.classify("analysis_files/output_3_0.png"), UrlClass::PassThrough);
/// assert_eq!(classifier.classify("https://example.com"), UrlClass::PassThrough);
/// ```
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    asset_prefix: String,
}

impl UrlClassifier {
    /// Classifier for a document with the given base name (file stem).
    pub fn for_document(base_name: &str, asset_suffix: &str) -> Self {
        Self {
            asset_prefix: format!("{}{}", base_name, asset_suffix),
        }
    }

    /// Classify a raw URL. Rules are applied in order; the first match wins.
    pub fn classify(&self, url: &str) -> UrlClass {
        if url.is_empty() || url.starts_with('#') || url.starts_with('/') {
            return UrlClass::PassThrough;
        }

        if has_scheme(url) {
            return UrlClass::PassThrough;
        }

        if UrlParts::split(url).path.starts_with(&self.asset_prefix) {
            return UrlClass::PassThrough;
        }

        UrlClass::RewriteCandidate
    }
}
