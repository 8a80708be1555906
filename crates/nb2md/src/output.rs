//! Structured output formatting for CLI commands.
//!
//! Human-readable output goes through `OutputContext`, which honours
//! `--quiet` and `--json`. With `--json`, each command prints a single
//! `JsonOutput` envelope and nothing else on stdout.

use chrono::Utc;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Version of the JSON envelope format
const OUTPUT_VERSION: &str = "0.1.0";

/// Where command output goes, and how much of it
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Results the user asked for; shown even with --quiet, never with --json
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if self.json {
            return Ok(());
        }
        write_line(io::stdout(), msg)
    }

    /// Progress and summaries, suppressed by --quiet or --json
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if self.quiet || self.json {
            return Ok(());
        }
        write_line(io::stdout(), msg)
    }

    /// Per-item problems on stderr, suppressed by --quiet or --json
    pub fn print_warning(&self, msg: impl Display) -> io::Result<()> {
        if self.quiet || self.json {
            return Ok(());
        }
        write_line(io::stderr(), format_args!("Warning: {}", msg))
    }

    /// Print the JSON envelope for a command result
    pub fn print_json<T: Serialize>(&self, output: &JsonOutput<T>) -> anyhow::Result<()> {
        write_line(io::stdout(), output.to_json_string()?)?;
        Ok(())
    }
}

/// Write one line, exiting quietly if the reader went away (`| head`)
fn write_line(mut out: impl Write, msg: impl Display) -> io::Result<()> {
    match writeln!(out, "{}", msg) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => std::process::exit(0),
        result => result,
    }
}

/// Envelope printed by every command under --json
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    /// False when the command ran but some notebooks or documents failed
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn new(data: T, success: bool, command: impl Into<String>) -> Self {
        Self {
            success,
            data,
            metadata: Metadata {
                version: OUTPUT_VERSION,
                timestamp: Utc::now().to_rfc3339(),
                command: command.into(),
            },
        }
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub version: &'static str,
    pub timestamp: String,
    pub command: String,
}

/// Process exit codes of the nb2md CLI
///
/// # Examples
///
/// ```rust
/// use nb2md::ExitCode;
///
/// assert_eq!(ExitCode::Success.code(), 0);
/// assert_eq!(ExitCode::ExternalError.code(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GenericError = 1,
    /// Bad argument, malformed config or invalid `NB2MD_BACKEND`
    InvalidArgument = 2,
    /// Source or destination directory missing
    NotFound = 3,
    /// nbconvert missing, or some notebooks or documents failed
    ExternalError = 10,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Exit code for a run that finished, with or without per-item failures
    pub fn for_report(clean: bool) -> Self {
        if clean {
            ExitCode::Success
        } else {
            ExitCode::ExternalError
        }
    }

    /// Classify a fatal error by its I/O kind, else by its message
    pub fn for_error(error: &anyhow::Error) -> Self {
        if let Some(io_error) = error.downcast_ref::<io::Error>() {
            return match io_error.kind() {
                io::ErrorKind::NotFound => ExitCode::NotFound,
                _ => ExitCode::ExternalError,
            };
        }

        let msg = error.to_string().to_lowercase();
        if msg.contains("nbconvert") {
            ExitCode::ExternalError
        } else if msg.contains("not found") {
            ExitCode::NotFound
        } else if msg.contains("invalid") || msg.contains("failed to parse") {
            ExitCode::InvalidArgument
        } else {
            ExitCode::GenericError
        }
    }
}
