//! Post-processing through an external metadata tool.
//!
//! After every file has been moved and linked, each directory holding real
//! files is handed to the tool once, which rewrites file modification times
//! from the embedded creation date. `Albums/` is never passed: it only holds
//! symlinks.
//!
//! The tool sits behind the [`MetadataTool`] trait so the pipeline does not
//! care how it is located or invoked.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{ReorgError, Result};
use crate::reorg::TargetLayout;

/// Default executable name of the metadata tool.
pub const DEFAULT_EXIFTOOL: &str = "exiftool";

/// Synchronous pass/fail port to a metadata rewriting tool.
pub trait MetadataTool {
    /// Set modification times of every file under `dir` from their metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot run or reports failure.
    fn adjust_dates(&self, dir: &Path) -> Result<()>;
}

/// `exiftool` invoked as a child process with inherited output streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifTool {
    program: String,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(DEFAULT_EXIFTOOL)
    }
}

impl ExifTool {
    /// Use `program` (a name looked up on `PATH`, or a path).
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the command for `dir` without running it.
    #[must_use]
    pub fn command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-FileModifyDate<CreateDate")
            .args(["-ext", "*", "-r"])
            .arg(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl MetadataTool for ExifTool {
    fn adjust_dates(&self, dir: &Path) -> Result<()> {
        log::debug!("Running {} on {}", self.program, dir.display());

        let status = self
            .command(dir)
            .status()
            .map_err(|source| ReorgError::MetadataToolSpawn {
                program: self.program.clone(),
                dir: dir.to_path_buf(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ReorgError::MetadataTool {
                program: self.program.clone(),
                dir: dir.to_path_buf(),
                status,
            })
        }
    }
}

/// Run `tool` over `Photos/`, `Archive/` and `Album-only Photos/`, in order.
///
/// # Errors
///
/// Stops at the first directory the tool fails on.
pub fn run_post_processing(tool: &dyn MetadataTool, layout: &TargetLayout) -> Result<()> {
    log::info!("Updating file modified date based on exif creation date via exiftool...");
    for dir in layout.real_file_dirs() {
        tool.adjust_dates(dir)?;
    }
    log::info!("Updating completed.");
    Ok(())
}
