//! Link rewriting for converted documents
//!
//! A converted document lives in the destination tree, but its relative links
//! were written against the original notebook's directory in the source tree.
//! This module finds those links and repairs them: links to sibling notebooks
//! are renamed to the converted documents, other local links are re-expressed
//! so they still reach the original files.

mod classifier;
mod extension;
mod resolver;
mod rewriter;
mod scanner;
mod url;

#[cfg(test)]
mod proptests;

pub use classifier::{UrlClass, UrlClassifier};
pub use extension::ExtensionRename;
pub use resolver::{resolve, resolve_path};
pub use rewriter::{DocumentRewriter, LinkStats, RewriteAction};
pub use scanner::{rewrite_text, scan, LinkForm, LinkOccurrence};
pub use url::{has_scheme, UrlParts};
