//! Notebook tree conversion
//!
//! Mirrors the source tree into the destination tree by running the
//! conversion backend once per notebook, then hands the destination tree to
//! the link rewriter.

mod backend;

pub use backend::{ConversionBackend, NbconvertBackend};

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::RewriteSettings;
use crate::document::{RewriteReport, TreeRewriter};
use crate::errors::ConvertError;
use crate::walk::files_with_extension;

/// A notebook the backend could not convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionFailure {
    pub notebook: PathBuf,
    pub message: String,
}

/// Summary of converting a source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub converted: usize,
    pub failures: Vec<ConversionFailure>,
}

/// Summary of a full convert-then-rewrite run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub conversion: ConversionReport,
    pub rewrite: RewriteReport,
}

impl PipelineReport {
    /// True if no notebook and no document failed.
    pub fn is_clean(&self) -> bool {
        self.conversion.failures.is_empty() && self.rewrite.is_clean()
    }
}

/// Find notebooks under `source_root`, relative to it and sorted.
///
/// Directories named in `skip_dirs` are not entered, nor is the destination
/// root when it is nested inside the source root.
pub fn find_notebooks(settings: &RewriteSettings, skip_dirs: &[String]) -> Result<Vec<PathBuf>> {
    let source_root = &settings.source_root;
    let destination_root = &settings.destination_root;

    let notebooks = files_with_extension(source_root, &settings.source_extension, |dir| {
        dir == destination_root
            || dir
                .file_name()
                .is_some_and(|name| skip_dirs.iter().any(|skip| name == skip.as_str()))
    })?;

    Ok(notebooks
        .into_iter()
        .filter_map(|nb| nb.strip_prefix(source_root).ok().map(Path::to_path_buf))
        .collect())
}

/// Convert every notebook into its mirror directory under the destination root.
///
/// A notebook that fails to convert is reported and skipped.
pub fn convert_tree(
    settings: &RewriteSettings,
    skip_dirs: &[String],
    backend: &dyn ConversionBackend,
) -> Result<ConversionReport> {
    let notebooks = find_notebooks(settings, skip_dirs)?;
    info!(
        count = notebooks.len(),
        backend = backend.name(),
        "converting notebooks"
    );

    let mut report = ConversionReport::default();
    for relative in notebooks {
        match convert_one(settings, &relative, backend) {
            Ok(()) => report.converted += 1,
            Err(e) => {
                warn!(notebook = %relative.display(), "conversion failed: {}", e);
                report.failures.push(ConversionFailure {
                    notebook: relative,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn convert_one(
    settings: &RewriteSettings,
    relative: &Path,
    backend: &dyn ConversionBackend,
) -> Result<(), ConvertError> {
    let output_dir = match relative.parent() {
        Some(parent) => settings.destination_root.join(parent),
        None => settings.destination_root.clone(),
    };
    fs::create_dir_all(&output_dir).map_err(|source| ConvertError::Io {
        path: output_dir.clone(),
        source,
    })?;

    backend.convert(&settings.source_root.join(relative), &output_dir)
}

/// Convert the source tree, then repair the links of every converted document.
pub fn run_pipeline(
    settings: &RewriteSettings,
    skip_dirs: &[String],
    backend: &dyn ConversionBackend,
) -> Result<PipelineReport> {
    fs::create_dir_all(&settings.destination_root)?;

    let conversion = convert_tree(settings, skip_dirs, backend)?;
    let rewrite = TreeRewriter::new(settings.clone()).run()?;

    Ok(PipelineReport {
        conversion,
        rewrite,
    })
}
