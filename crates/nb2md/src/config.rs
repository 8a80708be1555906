//! Configuration file loading and parsing.
//!
//! nb2md supports per-project configuration through `nb2md.toml` in the
//! source root. If no config file exists, the system falls back to defaults
//! matching Jupyter's `nbconvert --to markdown` output.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file.
pub const CONFIG_FILE: &str = "nb2md.toml";

/// Environment variable overriding `convert.backend`.
pub const BACKEND_ENV: &str = "NB2MD_BACKEND";

/// Checkpoint directories Jupyter keeps next to notebooks; never converted.
pub const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

const DEFAULT_SOURCE_EXTENSION: &str = "ipynb";
const DEFAULT_OUTPUT_EXTENSION: &str = "md";
const DEFAULT_ASSET_SUFFIX: &str = "_files/";
const DEFAULT_DESTINATION: &str = "md";

/// Root configuration structure loaded from `nb2md.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Nb2mdConfig {
    /// Document extensions and generated-asset naming (optional).
    pub documents: Option<DocumentsConfig>,
    /// Tree walking configuration (optional).
    pub walk: Option<WalkConfig>,
    /// Link rewrite behavior (optional).
    pub rewrite: Option<RewriteConfig>,
    /// Conversion backend configuration (optional).
    pub convert: Option<ConvertConfig>,
}

/// Document naming configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Extension of the original documents (default: "ipynb").
    pub source_extension: Option<String>,
    /// Extension of the converted documents (default: "md").
    pub output_extension: Option<String>,
    /// Suffix of per-document generated-asset directories (default: "_files/").
    pub asset_suffix: Option<String>,
}

/// Tree walking configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Directory names skipped while looking for notebooks.
    pub skip_dirs: Option<Vec<String>>,
}

/// Link rewrite configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteConfig {
    /// Skip documents whose mirror source directory is missing (default: true).
    pub strict_mirror: Option<bool>,
}

/// Conversion configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Backend selection: "auto", "jupyter" or "python" (default: "auto").
    pub backend: Option<BackendChoice>,
    /// Destination directory, relative to the source root (default: "md").
    pub destination: Option<String>,
}

/// Which nbconvert entry point to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// `jupyter nbconvert` if available, else `python3 -m nbconvert`.
    #[default]
    Auto,
    /// `jupyter nbconvert`.
    Jupyter,
    /// `python3 -m nbconvert`.
    Python,
}

impl std::str::FromStr for BackendChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(BackendChoice::Auto),
            "jupyter" => Ok(BackendChoice::Jupyter),
            "python" => Ok(BackendChoice::Python),
            other => anyhow::bail!(
                "Invalid backend '{}'. Use: auto, jupyter, python",
                other
            ),
        }
    }
}

impl Nb2mdConfig {
    /// Load configuration from `nb2md.toml` in `source_root` if it exists.
    ///
    /// Returns the default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load(source_root: &Path) -> Result<Self> {
        let config_path = source_root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_file(&config_path)
    }

    /// Load configuration from an explicit file. The file must exist.
    pub fn load_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: Nb2mdConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Backend choice, with `NB2MD_BACKEND` taking precedence over the file.
    pub fn backend(&self) -> Result<BackendChoice> {
        if let Ok(value) = std::env::var(BACKEND_ENV) {
            return value
                .parse()
                .with_context(|| format!("{}='{}' is invalid", BACKEND_ENV, value));
        }
        Ok(self
            .convert
            .as_ref()
            .and_then(|c| c.backend)
            .unwrap_or_default())
    }

    /// Destination directory name relative to the source root.
    pub fn destination(&self) -> String {
        self.convert
            .as_ref()
            .and_then(|c| c.destination.clone())
            .unwrap_or_else(|| DEFAULT_DESTINATION.to_string())
    }

    /// Directory names skipped while walking. Always contains the checkpoint directory.
    pub fn skip_dirs(&self) -> Vec<String> {
        let mut dirs = self
            .walk
            .as_ref()
            .and_then(|w| w.skip_dirs.clone())
            .unwrap_or_default();
        if !dirs.iter().any(|d| d == CHECKPOINT_DIR) {
            dirs.insert(0, CHECKPOINT_DIR.to_string());
        }
        dirs
    }

    /// Resolve into the plain values consumed by the link rewriter.
    pub fn rewrite_settings(
        &self,
        source_root: impl Into<PathBuf>,
        destination_root: impl Into<PathBuf>,
    ) -> RewriteSettings {
        let documents = self.documents.clone().unwrap_or_default();
        let mut settings = RewriteSettings::new(source_root, destination_root);

        if let Some(ext) = documents.source_extension {
            settings.source_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(ext) = documents.output_extension {
            settings.output_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(suffix) = documents.asset_suffix {
            settings.asset_suffix = suffix;
        }
        if let Some(strict) = self.rewrite.as_ref().and_then(|r| r.strict_mirror) {
            settings.strict_mirror = strict;
        }
        settings
    }
}

/// Plain values the rewrite core runs on.
///
/// Roots should be absolute; every path operation is computed from them,
/// never from the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteSettings {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    /// Extension of the original documents, without the dot.
    pub source_extension: String,
    /// Extension of the converted documents, without the dot.
    pub output_extension: String,
    /// Appended to a document's base name to form its generated-asset prefix.
    pub asset_suffix: String,
    /// Refuse to rewrite documents whose mirror source directory is missing.
    pub strict_mirror: bool,
}

impl RewriteSettings {
    /// Settings with default extensions for the given roots.
    pub fn new(source_root: impl Into<PathBuf>, destination_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            output_extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            asset_suffix: DEFAULT_ASSET_SUFFIX.to_string(),
            strict_mirror: true,
        }
    }
}
