//! Lexical path algebra.
//!
//! Join, normalize and relative-path computations used to carry a link target
//! from the source tree's frame of reference into the destination tree's.
//! Nothing in this module touches the filesystem or the process working
//! directory.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by resolving `.` and `..` components.
///
/// `..` directly below the root is dropped. Leading `..` components of a
/// relative path are kept, since there is nothing to cancel them against.
/// An empty result is rendered as `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Append a `/`-separated URL path to a filesystem directory.
///
/// URL separators are always `/`, whatever the host platform uses, so the
/// URL is split into segments instead of being handed to `Path::join` whole.
pub fn join_url_path(base_dir: &Path, url_path: &str) -> PathBuf {
    let mut joined = base_dir.to_path_buf();
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        joined.push(segment);
    }
    joined
}

/// Compute the path of `to` relative to the directory `from_dir`.
///
/// Both inputs are normalized first. Returns `None` when no relative path
/// exists: one side is absolute and the other is not, the two live under
/// different path prefixes, or `from_dir` climbs above a point that `to`
/// cannot be expressed against.
pub fn relative_path(from_dir: &Path, to: &Path) -> Option<PathBuf> {
    let from = normalize(from_dir);
    let to = normalize(to);

    if from.is_absolute() != to.is_absolute() {
        return None;
    }

    let from: Vec<Component> = from
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let to: Vec<Component> = to
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    if from[common..]
        .iter()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &to[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        Some(PathBuf::from("."))
    } else {
        Some(relative)
    }
}

/// Render a relative path with `/` separators, as it must appear in a URL.
pub fn to_url_path(path: &Path) -> String {
    let segments: Vec<String> = path
        .components()
        .map(|component| match component {
            Component::RootDir => String::new(),
            Component::CurDir => ".".to_string(),
            Component::ParentDir => "..".to_string(),
            Component::Normal(s) => s.to_string_lossy().into_owned(),
            Component::Prefix(p) => p.as_os_str().to_string_lossy().into_owned(),
        })
        .collect();

    match segments.as_slice() {
        [only] if only.is_empty() => "/".to_string(),
        _ => segments.join("/"),
    }
}
