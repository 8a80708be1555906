//! Per-document link rewriting.
//!
//! Each link occurrence gets exactly one terminal action, decided once:
//! cross-document links are renamed, other local links are remapped into the
//! source tree, everything else passes through. Deciding the rename first is
//! what keeps a renamed link from being remapped afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::classifier::{UrlClass, UrlClassifier};
use super::extension::ExtensionRename;
use super::resolver::resolve;
use super::scanner::rewrite_text;
use crate::config::RewriteSettings;
use crate::document::Document;

/// What to do with one URL occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteAction {
    /// Cross-document link; carries the URL with the output extension.
    RenameExtension(String),
    /// Local resource link; carries the URL remapped to the new location.
    RemapPath(String),
    /// Leave the URL as written.
    PassThrough,
}

/// Counts for one rewritten document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub renamed: usize,
    pub remapped: usize,
    pub untouched: usize,
}

impl LinkStats {
    pub fn changed(&self) -> usize {
        self.renamed + self.remapped
    }
}

/// Rewrites the links of one converted document.
///
/// # Example
///
/// ```
/// use nb2md::config::RewriteSettings;
/// use nb2md::document::Document;
/// use nb2md::links::DocumentRewriter;
/// use std::path::Path;
///
/// let settings = RewriteSettings::new("/work/proj", "/work/md");
/// let document = Document::new(&settings.destination_root, "/work/md/a.md");
/// let rewriter = DocumentRewriter::new(&document, Path::new("/work/proj"), &settings);
///
/// let (text, _) = rewriter.rewrite("[see](sub/b.ipynb) ![x](sub/img.png)");
/// assert_eq!(text, "[see](sub/b.md) ![x](../proj/sub/img.png)");
/// ```
#[derive(Debug, Clone)]
pub struct DocumentRewriter {
    classifier: UrlClassifier,
    rename: ExtensionRename,
    location: PathBuf,
    mirror_source_dir: PathBuf,
}

impl DocumentRewriter {
    /// Create a rewriter for `document`, whose original lived in `mirror_source_dir`.
    pub fn new(document: &Document, mirror_source_dir: &Path, settings: &RewriteSettings) -> Self {
        Self {
            classifier: UrlClassifier::for_document(&document.base_name(), &settings.asset_suffix),
            rename: ExtensionRename::new(&settings.source_extension, &settings.output_extension),
            location: document.path().to_path_buf(),
            mirror_source_dir: mirror_source_dir.to_path_buf(),
        }
    }

    /// Decide the action for a single URL.
    pub fn action(&self, url: &str) -> RewriteAction {
        if let Some(renamed) = self.rename.rename(url) {
            return RewriteAction::RenameExtension(renamed);
        }

        match self.classifier.classify(url) {
            UrlClass::PassThrough => RewriteAction::PassThrough,
            UrlClass::RewriteCandidate => {
                match resolve(url, &self.location, &self.mirror_source_dir) {
                    Some(remapped) => RewriteAction::RemapPath(remapped),
                    None => RewriteAction::PassThrough,
                }
            }
        }
    }

    /// Rewrite every link in `text`, returning the new text and per-action counts.
    pub fn rewrite(&self, text: &str) -> (String, LinkStats) {
        let mut stats = LinkStats::default();

        let rewritten = rewrite_text(text, |occurrence| match self.action(occurrence.url) {
            RewriteAction::RenameExtension(url) => {
                debug!(from = occurrence.url, to = %url, "renamed cross-document link");
                stats.renamed += 1;
                Some(url)
            }
            RewriteAction::RemapPath(url) if url != occurrence.url => {
                debug!(from = occurrence.url, to = %url, "remapped resource link");
                stats.remapped += 1;
                Some(url)
            }
            RewriteAction::RemapPath(_) | RewriteAction::PassThrough => {
                stats.untouched += 1;
                None
            }
        });

        (rewritten, stats)
    }
}
