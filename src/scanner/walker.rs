//! Single-level, name-sorted directory listing.
//!
//! The source tree is never walked recursively: each category folder is a
//! flat list of photos and sidecars. Entries come back sorted by file name
//! so collision renames are the same on every platform and every run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::SourceEntry;
use crate::error::{ReorgError, Result};

/// List the immediate children of `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`ReorgError::ReadDir`] if `dir` does not exist, is not a
/// directory, or any entry cannot be read.
pub fn list_entries(dir: &Path) -> Result<Vec<SourceEntry>> {
    let read_dir_err = |source: io::Error| ReorgError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(dir).map_err(read_dir_err)?;
    if !metadata.is_dir() {
        return Err(read_dir_err(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| read_dir_err(io::Error::from(e)))?;
        entries.push(SourceEntry {
            name: entry.file_name().to_os_string(),
            path: PathBuf::from(entry.path()),
            is_dir: entry.file_type().is_dir(),
        });
    }

    log::trace!("Listed {} entries in {}", entries.len(), dir.display());
    Ok(entries)
}
