//! Converted documents and their place in the mirror tree
//!
//! The destination tree mirrors the source tree: a document at
//! `<destination>/x/y/doc.md` was converted from `<source>/x/y/doc.ipynb`.
//! `Document` carries that correspondence, and the driver walks every
//! document and rewrites its links.

mod driver;

pub use driver::{DocumentFailure, RewriteReport, TreeRewriter};

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::walk::files_with_extension;

/// A converted document in the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    relative: PathBuf,
    mirrored: bool,
}

impl Document {
    /// Locate a document against the destination root.
    ///
    /// A path outside the destination root has no mirror position; it is
    /// treated as sitting at the top of the tree and flagged as unmirrored.
    pub fn new(destination_root: &Path, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match path.strip_prefix(destination_root) {
            Ok(relative) => Self {
                relative: relative.to_path_buf(),
                path,
                mirrored: true,
            },
            Err(_) => Self {
                relative: path.file_name().map(PathBuf::from).unwrap_or_default(),
                path,
                mirrored: false,
            },
        }
    }

    /// Location in the destination tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document lies under the destination root.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// File stem, which also names the document's generated-asset directory.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory the original document lived in inside the source tree.
    pub fn mirror_dir(&self, source_root: &Path) -> PathBuf {
        match self.relative.parent() {
            Some(parent) => source_root.join(parent),
            None => source_root.to_path_buf(),
        }
    }
}

/// Find every converted document under the destination root.
///
/// A directory `<name><asset_suffix>` is a generated-asset directory, and is
/// not entered, only when the document `<name>.<output_extension>` sits
/// beside it. Any other directory is walked, whatever its name.
pub fn find_documents(
    destination_root: &Path,
    output_extension: &str,
    asset_suffix: &str,
) -> Result<Vec<Document>> {
    let paths = files_with_extension(destination_root, output_extension, |dir| {
        is_asset_dir(dir, output_extension, asset_suffix)
    })?;

    Ok(paths
        .into_iter()
        .map(|path| Document::new(destination_root, path))
        .collect())
}

fn is_asset_dir(dir: &Path, output_extension: &str, asset_suffix: &str) -> bool {
    let asset_dir_suffix = asset_suffix.trim_end_matches('/');
    if asset_dir_suffix.is_empty() {
        return false;
    }

    let Some(name) = dir.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    match name.strip_suffix(asset_dir_suffix) {
        Some(base_name) if !base_name.is_empty() => dir
            .with_file_name(format!("{}.{}", base_name, output_extension))
            .is_file(),
        _ => false,
    }
}
