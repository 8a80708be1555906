//! Conversion backends.
//!
//! The actual notebook-to-Markdown conversion is delegated to Jupyter's
//! `nbconvert`, reached either as `jupyter nbconvert` or as
//! `python3 -m nbconvert`. Both are probed without changing the process
//! working directory.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::BackendChoice;
use crate::errors::ConvertError;

/// Something that converts one notebook into the output directory.
///
/// The converter writes `<output_dir>/<stem>.<ext>` and, when the notebook
/// has rich outputs, a `<stem>_files/` directory beside it.
pub trait ConversionBackend {
    /// Human-readable name, e.g. "jupyter nbconvert".
    fn name(&self) -> &str;

    /// Convert `notebook` into `output_dir`.
    fn convert(&self, notebook: &Path, output_dir: &Path) -> Result<(), ConvertError>;
}

/// `nbconvert` invoked as an external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbconvertBackend {
    name: String,
    program: OsString,
    prefix_args: Vec<String>,
}

impl NbconvertBackend {
    /// `jupyter nbconvert`.
    pub fn jupyter() -> Self {
        Self {
            name: "jupyter nbconvert".to_string(),
            program: OsString::from("jupyter"),
            prefix_args: vec!["nbconvert".to_string()],
        }
    }

    /// `python3 -m nbconvert`.
    pub fn python() -> Self {
        Self {
            name: "python3 -m nbconvert".to_string(),
            program: OsString::from("python3"),
            prefix_args: vec!["-m".to_string(), "nbconvert".to_string()],
        }
    }

    /// Pick an available backend.
    ///
    /// `Auto` prefers `jupyter` on `PATH`, then a `python3` that can import
    /// `nbconvert`. Explicit choices are still verified.
    pub fn discover(choice: BackendChoice) -> Result<Self, ConvertError> {
        let candidates = match choice {
            BackendChoice::Auto => vec![Self::jupyter(), Self::python()],
            BackendChoice::Jupyter => vec![Self::jupyter()],
            BackendChoice::Python => vec![Self::python()],
        };

        for candidate in &candidates {
            if candidate.is_available() {
                return Ok(candidate.clone());
            }
        }

        Err(ConvertError::BackendNotFound {
            tried: candidates
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Check whether this backend can run on this machine.
    pub fn is_available(&self) -> bool {
        if which::which(&self.program).is_err() {
            return false;
        }
        if self.program != "python3" {
            return true;
        }

        Command::new(&self.program)
            .args(["-c", "import nbconvert"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl ConversionBackend for NbconvertBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert(&self, notebook: &Path, output_dir: &Path) -> Result<(), ConvertError> {
        let output = Command::new(&self.program)
            .args(&self.prefix_args)
            .args(["--to", "markdown", "--output-dir"])
            .arg(output_dir)
            .arg(notebook)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ConvertError::Io {
                path: notebook.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::ConversionFailed {
                notebook: notebook.to_path_buf(),
                message: stderr.lines().last().unwrap_or("no output").trim().to_string(),
            });
        }

        Ok(())
    }
}
