//! Command-line interface definitions for takeout-reorg.
//!
//! # Example
//!
//! ```bash
//! # Reorganize an export into a library
//! takeout-reorg ~/Takeout ~/Pictures/Library
//!
//! # Skip exiftool and print a machine-readable summary
//! takeout-reorg --skip-metadata --json ~/Takeout ~/Pictures/Library
//!
//! # Verbose mode for debugging
//! takeout-reorg -v ~/Takeout ~/Pictures/Library
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Reorganize an exported photo library into a deduplicated layout.
///
/// Photos from the year folders go to `Photos/`, archived photos to
/// `Archive/`, and every album becomes a directory of symlinks under
/// `Albums/`. Album photos found nowhere else go to `Album-only Photos/`.
#[derive(Debug, Parser)]
#[command(name = "takeout-reorg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Export directory containing the photo root (e.g. "Google Photos")
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory to build the reorganized library in
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not run the metadata tool after reorganizing
    #[arg(long)]
    pub skip_metadata: bool,

    /// Metadata tool executable to run after reorganizing
    #[arg(long, value_name = "PATH")]
    pub exiftool: Option<String>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Report errors as structured JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}
