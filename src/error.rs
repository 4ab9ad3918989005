//! Structured error handling and exit codes.
//!
//! Every failure in the reorganization pipeline is fatal: the first error
//! aborts the run, and files already moved stay where they were moved.
//! [`ReorgError`] names the failing operation and carries the path that
//! produced it, so the single diagnostic line printed by `main` is enough
//! to find the offending file.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use serde::Serialize;
use thiserror::Error;

use crate::reorg::Tier;

/// Errors that abort a reorganization run.
#[derive(Debug, Error)]
pub enum ReorgError {
    /// A source or category directory could not be listed.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory that failed to list
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A source file could not be opened or read while hashing.
    #[error("failed to hash file {path}: {source}")]
    Hash {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be moved into the target layout.
    #[error("failed to move photo {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No relative path exists from an album directory to its backing file.
    #[error("failed to get relative path from {from} to {to}")]
    RelativePath { from: PathBuf, to: PathBuf },

    /// An album symlink could not be created.
    #[error("failed to create symlink {link} -> {target}: {source}")]
    Symlink {
        link: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata tool could not be started.
    #[error("failed to run {program} on {dir}: {source}")]
    MetadataToolSpawn {
        program: String,
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata tool exited unsuccessfully.
    #[error("{program} failed on {dir}: {status}")]
    MetadataTool {
        program: String,
        dir: PathBuf,
        status: ExitStatus,
    },

    /// A reconciliation pass was started after a pass of lower precedence.
    #[error("cannot start {requested} pass after {current} pass")]
    PassOrder { current: Tier, requested: Tier },
}

impl ReorgError {
    /// Get the path associated with this error (if any).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadDir { path, .. } | Self::CreateDir { path, .. } | Self::Hash { path, .. } => {
                Some(path)
            }
            Self::Move { from, .. } => Some(from),
            Self::RelativePath { to, .. } => Some(to),
            Self::Symlink { link, .. } => Some(link),
            Self::MetadataToolSpawn { dir, .. } | Self::MetadataTool { dir, .. } => Some(dir),
            Self::PassOrder { .. } => None,
        }
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ReorgError>;

/// Exit codes for the takeout-reorg application.
///
/// - 0: Success (all passes and post-processing completed)
/// - 1: General error (the run was aborted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: reorganization and post-processing completed.
    Success = 0,
    /// General error: the first failure aborted the run.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RO000",
            Self::GeneralError => "RO001",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "RO001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including the full cause chain
    pub message: String,
    /// Path that produced the error, when one is known
    pub path: Option<PathBuf>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let path = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ReorgError>())
            .and_then(ReorgError::path)
            .map(Path::to_path_buf);

        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path,
        }
    }
}
