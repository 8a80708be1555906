//! Command-line interface definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Notebook tree to Markdown tree converter
///
/// Converts every notebook under a source directory with Jupyter's nbconvert,
/// mirroring the directory layout, then repairs the links of the converted
/// documents so they still resolve from their new location.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments, configuration or usage error
///   3  - Source or destination directory not found
///  10  - External dependency failed (nbconvert missing, or a notebook or document failed)
#[derive(Parser)]
#[command(name = "nb2md", version)]
#[command(about = "Convert notebook trees to Markdown and repair links", long_about = None)]
pub struct Cli {
    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print a JSON report instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (default: nb2md.toml in the source directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert all notebooks and repair links in the converted documents
    Convert {
        /// Directory containing the notebooks
        #[arg(default_value = ".")]
        source: PathBuf,

        /// Output directory (default: <SOURCE>/md, or convert.destination from config)
        destination: Option<PathBuf>,
    },

    /// Repair links in an already converted tree without running nbconvert
    Rewrite {
        /// Directory containing the original notebooks
        source: PathBuf,

        /// Directory containing the converted documents
        destination: PathBuf,
    },

    /// Show which nbconvert backend would be used
    Backend {
        /// Directory whose nb2md.toml is consulted
        #[arg(default_value = ".")]
        source: PathBuf,
    },
}
