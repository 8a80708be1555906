//! Translation of relative link targets between the source and destination trees.

use std::path::Path;

use super::url::UrlParts;
use crate::paths::{join_url_path, normalize, relative_path, to_url_path};

/// Remap a URL path found in a converted document.
///
/// `url_path` is resolved as if it still sat next to the original document
/// in `mirror_source_dir`, then re-expressed relative to the directory of
/// `document`, the converted document's new location. Target existence is
/// never checked: a dangling link stays dangling, in the same relative shape.
///
/// Returns `None` when no relative path can be formed between the two
/// locations.
pub fn resolve_path(url_path: &str, document: &Path, mirror_source_dir: &Path) -> Option<String> {
    let target = normalize(&join_url_path(mirror_source_dir, url_path));
    let document_dir = document.parent().unwrap_or(Path::new(""));

    let mut remapped = to_url_path(&relative_path(document_dir, &target)?);
    if url_path.ends_with('/') && !remapped.ends_with('/') {
        remapped.push('/');
    }
    Some(remapped)
}

/// Remap a full URL, carrying its query and fragment over unchanged.
///
/// # Example
///
/// ```
/// use nb2md::links::resolve;
/// use std::path::Path;
///
/// let url = resolve("sub/img.png", Path::new("/work/md/a.md"), Path::new("/work/proj"));
/// assert_eq!(url.as_deref(), Some("../proj/sub/img.png"));
/// ```
pub fn resolve(url: &str, document: &Path, mirror_source_dir: &Path) -> Option<String> {
    let parts = UrlParts::split(url);
    let path = resolve_path(parts.path, document, mirror_source_dir)?;
    Some(parts.with_path(&path))
}
