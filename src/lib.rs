//! takeout-reorg - Deduplicating reorganizer for exported photo libraries
//!
//! Takes an export laid out as `Google Photos/Photos from YYYY/`,
//! `Google Photos/Archive/` and one folder per album, and rebuilds it as:
//!
//! - `Photos/`: every photo from the year folders
//! - `Archive/`: every archived photo
//! - `Album-only Photos/`: album photos whose content appears nowhere else
//! - `Albums/<name>/`: relative symlinks into the three stores above
//!
//! Duplicates are found by content (SHA-256), never by name.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod progress;
pub mod reorg;
pub mod scanner;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::metadata::{run_post_processing, ExifTool};
use crate::progress::Progress;
use crate::reorg::{PhotoIndex, Reconciler, ReorgSummary, SourceLayout, TargetLayout};

/// Run the whole pipeline for parsed CLI arguments.
///
/// # Errors
///
/// Returns the first error from configuration, reorganization or
/// post-processing, with context naming the stage.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(&cli)?;
    log::debug!("Configuration: {:?}", config);

    let summary = reorganize(&cli, &config)?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?;
        println!("{json}");
    } else {
        log::info!("Done: {summary}");
    }

    Ok(ExitCode::Success)
}

/// Reorganize `cli.source` into `cli.target`, then post-process unless
/// configured not to.
///
/// # Errors
///
/// Returns the first failure; files moved before it stay moved.
pub fn reorganize(cli: &Cli, config: &Config) -> Result<ReorgSummary> {
    let source = SourceLayout::new(&cli.source, &config.source_root_dir);
    let target = TargetLayout::new(&cli.target).with_context(|| {
        format!(
            "Failed to resolve target directory {}",
            cli.target.display()
        )
    })?;

    let mut index = PhotoIndex::new();
    let mut reconciler = Reconciler::new(source, target.clone(), &mut index);
    if config.progress {
        reconciler = reconciler.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let summary = reconciler.run().context("Reorganization failed")?;

    if config.skip_metadata {
        log::info!("Skipping metadata post-processing");
    } else {
        let tool = ExifTool::new(config.exiftool.clone());
        run_post_processing(&tool, &target).context("Metadata post-processing failed")?;
    }

    Ok(summary)
}
