//! Recursive directory listing shared by the notebook and document walks.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// List regular files under `root` whose extension equals `extension`.
///
/// Directories for which `skip_dir` returns true are not entered. Symlinked
/// directories are not followed. The result is sorted.
pub fn files_with_extension<F>(root: &Path, extension: &str, skip_dir: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read entry in {}", dir.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat {}", path.display()))?;

            if file_type.is_dir() {
                if !skip_dir(&path) {
                    pending.push(path);
                }
            } else if file_type.is_file()
                && path.extension().is_some_and(|ext| ext == extension)
            {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
