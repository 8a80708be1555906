//! Tree walker that rewrites every converted document in place.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use super::{find_documents, Document};
use crate::config::RewriteSettings;
use crate::errors::RewriteError;
use crate::links::{DocumentRewriter, LinkStats};

/// A document the driver could not rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub path: PathBuf,
    /// Machine-readable kind: "read", "write" or "tree_asymmetry".
    pub kind: String,
    pub message: String,
}

/// Summary of one rewrite run over a destination tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Documents visited.
    pub documents: usize,
    /// Documents whose text changed and was written back.
    pub changed: usize,
    pub renamed_links: usize,
    pub remapped_links: usize,
    pub failures: Vec<DocumentFailure>,
}

impl RewriteReport {
    /// True if every document was processed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, stats: &LinkStats) {
        if stats.changed() > 0 {
            self.changed += 1;
        }
        self.renamed_links += stats.renamed;
        self.remapped_links += stats.remapped;
    }
}

/// Rewrites the links of every document in a destination tree.
///
/// Documents are processed one at a time, read, rewritten in memory and
/// written back. A document that fails is reported and skipped; the walk
/// always continues.
pub struct TreeRewriter {
    settings: RewriteSettings,
}

impl TreeRewriter {
    pub fn new(settings: RewriteSettings) -> Self {
        Self { settings }
    }

    /// Enumerate and rewrite every converted document.
    ///
    /// Errors only when the destination tree itself cannot be listed.
    pub fn run(&self) -> Result<RewriteReport> {
        let documents = find_documents(
            &self.settings.destination_root,
            &self.settings.output_extension,
            &self.settings.asset_suffix,
        )?;
        info!(
            count = documents.len(),
            root = %self.settings.destination_root.display(),
            "rewriting links"
        );
        Ok(self.rewrite_documents(&documents))
    }

    /// Rewrite the given documents, collecting per-document failures.
    pub fn rewrite_documents(&self, documents: &[Document]) -> RewriteReport {
        let mut report = RewriteReport::default();

        for document in documents {
            report.documents += 1;
            match self.rewrite_document(document) {
                Ok(stats) => report.record(&stats),
                Err(e) => {
                    warn!(path = %document.path().display(), "skipping document: {}", e);
                    report.failures.push(DocumentFailure {
                        path: document.path().to_path_buf(),
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Rewrite one document in place. Unchanged documents are not written.
    pub fn rewrite_document(&self, document: &Document) -> Result<LinkStats, RewriteError> {
        let mirror_dir = self.mirror_dir(document)?;

        let text = fs::read_to_string(document.path()).map_err(|source| RewriteError::Read {
            path: document.path().to_path_buf(),
            source,
        })?;

        let rewriter = DocumentRewriter::new(document, &mirror_dir, &self.settings);
        let (rewritten, stats) = rewriter.rewrite(&text);

        if rewritten != text {
            fs::write(document.path(), rewritten).map_err(|source| RewriteError::Write {
                path: document.path().to_path_buf(),
                source,
            })?;
        }

        Ok(stats)
    }

    /// Mirror source directory of a document, checked against the source tree.
    fn mirror_dir(&self, document: &Document) -> Result<PathBuf, RewriteError> {
        let mirror_dir = document.mirror_dir(&self.settings.source_root);
        if document.is_mirrored() && mirror_dir.is_dir() {
            return Ok(mirror_dir);
        }

        let error = RewriteError::TreeAsymmetry {
            path: document.path().to_path_buf(),
            expected: mirror_dir.clone(),
        };
        if self.settings.strict_mirror {
            return Err(error);
        }

        warn!("{}; rewriting against the assumed location", error);
        Ok(mirror_dir)
    }
}
