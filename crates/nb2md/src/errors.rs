//! Error types and actionable error formatting.
//!
//! Library operations report typed errors (`RewriteError`, `ConvertError`).
//! Fatal CLI errors with a known fix are wrapped in an `ActionableError`
//! that lists possible causes and remediation steps.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure rewriting a single converted document.
///
/// None of these abort a tree walk; the driver records them and moves on.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The document could not be read (missing, unreadable, not UTF-8).
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The rewritten document could not be written back.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The document has no counterpart directory in the source tree.
    #[error("No mirror for {path}: expected source directory {expected} does not exist")]
    TreeAsymmetry { path: PathBuf, expected: PathBuf },
}

impl RewriteError {
    /// Short machine-readable kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RewriteError::Read { .. } => "read",
            RewriteError::Write { .. } => "write",
            RewriteError::TreeAsymmetry { .. } => "tree_asymmetry",
        }
    }
}

/// Failure finding or running the conversion backend.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Neither `jupyter` nor a Python with `nbconvert` is available.
    #[error("nbconvert not found (tried: {tried})")]
    BackendNotFound { tried: String },
    /// The backend ran but did not convert the notebook.
    #[error("Conversion of {notebook} failed: {message}")]
    ConversionFailed { notebook: PathBuf, message: String },
    /// The backend process could not be started, or a directory could not be created.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use nb2md::errors::ActionableError;
///
/// let error = ActionableError::new("Directory notebooks/ not found")
///     .with_cause("The path may be misspelled")
///     .with_remedy("Check the path: ls notebooks/");
///
/// eprintln!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    /// The main error message
    error: String,
    /// Possible causes (diagnostic hints)
    causes: Vec<String>,
    /// Remediation steps (how to fix)
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("{}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// Helper to create the missing-backend error with standard remediation.
pub fn backend_not_found(tried: &str) -> ActionableError {
    ActionableError::new(format!("nbconvert not found (tried: {})", tried))
        .with_cause("Jupyter is not installed in the active environment")
        .with_cause("The virtual environment providing Jupyter is not activated")
        .with_remedy("Install it: python3 -m pip install jupyter nbconvert")
        .with_remedy("Or force a backend: NB2MD_BACKEND=python nb2md convert")
}

/// Helper to create the missing-directory error for a source or destination argument.
pub fn directory_not_found(path: &std::path::Path) -> ActionableError {
    ActionableError::new(format!("Directory {} not found", path.display()))
        .with_cause("The path may be misspelled")
        .with_cause("The command may have been run from a different directory")
        .with_remedy("Pass the directories explicitly: nb2md rewrite <SOURCE> <DEST>")
}
