//! nb2md
//!
//! Converts a tree of Jupyter notebooks into a mirrored tree of Markdown
//! documents and repairs every link so it still resolves after the move.

use anyhow::{Context, Result};
use clap::Parser;
use nb2md::cli::{Cli, Commands};
use nb2md::config::Nb2mdConfig;
use nb2md::convert::{run_pipeline, ConversionBackend, NbconvertBackend, PipelineReport};
use nb2md::document::{RewriteReport, TreeRewriter};
use nb2md::errors::{backend_not_found, directory_not_found, ConvertError};
use nb2md::output::{ExitCode, JsonOutput, OutputContext};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "error" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::for_error(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let output_ctx = OutputContext::new(cli.quiet, cli.json);
    let current_dir = env::current_dir()?;

    match &cli.command {
        Commands::Convert {
            source,
            destination,
        } => {
            let source_root = existing_dir(&current_dir, source)?;
            let config = load_config(cli.config.as_deref(), &source_root)?;

            let destination = match destination {
                Some(dest) => current_dir.join(dest),
                None => source_root.join(config.destination()),
            };
            fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create {}", destination.display()))?;
            let destination_root = destination
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", destination.display()))?;

            let backend = discover_backend(&config)?;
            let settings = config.rewrite_settings(&source_root, &destination_root);

            output_ctx.print_info(format!(
                "Converting notebooks from {} -> {} using {} ...",
                source_root.display(),
                destination_root.display(),
                backend.name()
            ))?;

            let report = run_pipeline(&settings, &config.skip_dirs(), &backend)?;
            if output_ctx.is_json() {
                output_ctx.print_json(&JsonOutput::new(&report, report.is_clean(), "convert"))?;
            } else {
                print_pipeline_report(&output_ctx, &report, &destination_root)?;
            }

            Ok(ExitCode::for_report(report.is_clean()))
        }

        Commands::Rewrite {
            source,
            destination,
        } => {
            let source_root = existing_dir(&current_dir, source)?;
            let destination_root = existing_dir(&current_dir, destination)?;
            let config = load_config(cli.config.as_deref(), &source_root)?;

            let settings = config.rewrite_settings(&source_root, &destination_root);
            let report = TreeRewriter::new(settings).run()?;

            if output_ctx.is_json() {
                output_ctx.print_json(&JsonOutput::new(&report, report.is_clean(), "rewrite"))?;
            } else {
                print_rewrite_report(&output_ctx, &report)?;
            }

            Ok(ExitCode::for_report(report.is_clean()))
        }

        Commands::Backend { source } => {
            let source_root = existing_dir(&current_dir, source)?;
            let config = load_config(cli.config.as_deref(), &source_root)?;
            let backend = discover_backend(&config)?;

            if output_ctx.is_json() {
                let data = serde_json::json!({ "backend": backend.name() });
                output_ctx.print_json(&JsonOutput::new(data, true, "backend"))?;
            } else {
                output_ctx.print_data(backend.name())?;
            }
            Ok(ExitCode::Success)
        }
    }
}

/// Resolve a directory argument against the current directory; it must exist.
fn existing_dir(current_dir: &Path, dir: &Path) -> Result<PathBuf> {
    let path = current_dir.join(dir);
    if !path.is_dir() {
        return Err(directory_not_found(&path).into());
    }
    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

fn load_config(explicit: Option<&Path>, source_root: &Path) -> Result<Nb2mdConfig> {
    match explicit {
        Some(path) => Nb2mdConfig::load_file(path),
        None => Nb2mdConfig::load(source_root),
    }
}

fn discover_backend(config: &Nb2mdConfig) -> Result<NbconvertBackend> {
    NbconvertBackend::discover(config.backend()?).map_err(|e| match e {
        ConvertError::BackendNotFound { tried } => backend_not_found(&tried).into(),
        other => other.into(),
    })
}

fn print_rewrite_report(ctx: &OutputContext, report: &RewriteReport) -> Result<()> {
    for failure in &report.failures {
        ctx.print_warning(&failure.message)?;
    }
    ctx.print_info(format!(
        "Rewrote links in {} of {} documents ({} renamed, {} remapped).",
        report.changed, report.documents, report.renamed_links, report.remapped_links
    ))?;
    if !report.is_clean() {
        ctx.print_data(format!("{} documents could not be rewritten.", report.failures.len()))?;
    }
    Ok(())
}

fn print_pipeline_report(
    ctx: &OutputContext,
    report: &PipelineReport,
    destination_root: &Path,
) -> Result<()> {
    for failure in &report.conversion.failures {
        ctx.print_warning(&failure.message)?;
    }
    print_rewrite_report(ctx, &report.rewrite)?;
    ctx.print_info(format!(
        "Done. Converted {} notebooks into '{}' and fixed links.",
        report.conversion.converted,
        destination_root.display()
    ))?;
    if !report.conversion.failures.is_empty() {
        ctx.print_data(format!(
            "{} notebooks could not be converted.",
            report.conversion.failures.len()
        ))?;
    }
    Ok(())
}
