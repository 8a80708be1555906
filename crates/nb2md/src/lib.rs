//! Notebook tree to Markdown tree conversion with link repair.
//!
//! Converts every notebook of a source tree into a mirrored destination tree
//! and rewrites the links of the converted documents so they still resolve:
//! links to sibling notebooks point at the converted documents, and all other
//! relative links point back at the original files in the source tree.

pub mod cli;
pub mod config;
pub mod convert;
pub mod document;
pub mod errors;
pub mod links;
pub mod output;
pub mod paths;
mod walk;

// Re-export commonly used types
pub use config::{Nb2mdConfig, RewriteSettings};
pub use convert::{run_pipeline, ConversionBackend, NbconvertBackend, PipelineReport};
pub use document::{RewriteReport, TreeRewriter};
pub use output::{ExitCode, JsonOutput, OutputContext};
