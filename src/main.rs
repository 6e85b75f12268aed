//! Course-Triage main entry point
//!
//! This is the command-line interface for the hard-link triage engine.

use anyhow::{bail, Context};
use clap::Parser;
use course_triage::config::{hash_config_content, load_config_with_hash, Config};
use course_triage::ingest::scan_export;
use course_triage::output::{print_statistics, report_stem, write_reports, TriageStatistics};
use course_triage::{process_export, TriageError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Course-Triage: hard-link triage for LMS course exports
///
/// Scans extracted course exports for hand-authored links that will break
/// when the course is copied, and suggests the stable content reference each
/// one should use instead.
#[derive(Parser, Debug)]
#[command(name = "course-triage")]
#[command(version = "1.0.0")]
#[command(about = "Hard-link triage for LMS course exports", long_about = None)]
struct Cli {
    /// Extracted course export directories
    #[arg(value_name = "EXPORT_DIR", required = true)]
    exports: Vec<PathBuf>,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and scan exports without writing reports
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, &cli.exports)
    } else {
        handle_triage(config, config_hash, cli.exports, cli.quiet).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("course_triage=info,warn"),
            1 => EnvFilter::new("course_triage=debug,info"),
            2 => EnvFilter::new("course_triage=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load_configuration(cli: &Cli) -> anyhow::Result<(Config, String)> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok((config, hash))
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Ok((Config::default(), hash_config_content("")))
        }
    }
}

/// Handles the --dry-run mode: validates config and scans each export
fn handle_dry_run(config: &Config, exports: &[PathBuf]) -> anyhow::Result<()> {
    println!("=== Course-Triage Dry Run ===\n");

    println!("Platform:");
    println!("  Base URL: {}", config.platform.base_url);
    println!("  x-id prefix: {}", config.platform.xid_prefix);
    println!(
        "  Course-section pattern: {}",
        config.platform.course_section_pattern
    );

    println!("\nReport:");
    println!("  Output directory: {}", config.report.output_dir);
    println!("  Skip pattern: {}", config.report.skip_name_pattern);
    println!("  Markdown: {}", config.report.write_markdown);
    println!("  Database: {}", config.report.write_database);

    println!("\nExports ({}):", exports.len());
    for export in exports {
        let contents = scan_export(export)
            .with_context(|| format!("Failed to scan {}", export.display()))?;
        let name = export
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        println!("  - {}", export.display());
        println!("    Descriptors: {}", contents.descriptors.len());
        println!("    HTML files: {}", contents.pages.len());
        println!("    Collection files: {}", contents.collection_files.len());
        if !contents.manifest.is_file() {
            println!("    ! Missing {}", contents.manifest.display());
        }
        println!("    Report: {}.*", report_stem(&name));
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Triages every export on its own blocking task
async fn handle_triage(
    config: Config,
    config_hash: String,
    exports: Vec<PathBuf>,
    quiet: bool,
) -> anyhow::Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping at the next item");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    let total = exports.len();
    let config = Arc::new(config);
    let config_hash = Arc::new(config_hash);
    let mut join_set = JoinSet::new();

    for export in exports {
        let config = Arc::clone(&config);
        let config_hash = Arc::clone(&config_hash);
        let cancel = Arc::clone(&cancel);

        join_set.spawn_blocking(move || {
            let result = process_export(&export, &config, &config_hash, &cancel)
                .map_err(anyhow::Error::from)
                .and_then(|report| {
                    write_reports(&report, &config.report)?;
                    Ok(report)
                });
            (export, result)
        });
    }

    let mut failures = 0;
    while let Some(joined) = join_set.join_next().await {
        let (export, result) = joined.context("Triage task failed to complete")?;
        match result {
            Ok(report) => {
                if !quiet {
                    print_statistics(&report.export_name, &TriageStatistics::from_report(&report));
                    println!();
                }
            }
            Err(e) => {
                if let Some(TriageError::Cancelled { remaining }) = e.downcast_ref::<TriageError>() {
                    tracing::warn!(
                        "{}: cancelled with {} items left, no report written",
                        export.display(),
                        remaining
                    );
                } else {
                    tracing::error!("{}: {:#}", export.display(), e);
                }
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} exports were not triaged", failures, total);
    }

    tracing::info!("Triaged {} exports", total);
    Ok(())
}
