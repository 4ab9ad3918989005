//! Collision-avoiding file placement.
//!
//! A desired target path is used as-is when nothing exists there. When
//! something does, the file's fingerprint is inserted before the extension
//! (`IMG_1.jpg` -> `IMG_1_<fingerprint>.jpg`). This only reacts to name
//! collisions; whether the contents match is never checked here.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ReorgError, Result};
use crate::scanner::Fingerprint;

/// Final location chosen for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Path the file ends up at
    pub path: PathBuf,
    /// Whether the fingerprint suffix had to be added
    pub renamed: bool,
}

/// Build the fingerprint-suffixed variant of `desired`.
///
/// Pure function of its inputs: the same path and fingerprint always give
/// the same result.
#[must_use]
pub fn collision_path(desired: &Path, fingerprint: &Fingerprint) -> PathBuf {
    let stem = desired.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    name.push("_");
    name.push(fingerprint.as_str());
    if let Some(ext) = desired.extension() {
        name.push(".");
        name.push(ext);
    }

    desired.with_file_name(name)
}

/// Decide where a file with `fingerprint` should go if it wants `desired`.
#[must_use]
pub fn resolve_placement(desired: &Path, fingerprint: &Fingerprint) -> Placement {
    if occupied(desired) {
        Placement {
            path: collision_path(desired, fingerprint),
            renamed: true,
        }
    } else {
        Placement {
            path: desired.to_path_buf(),
            renamed: false,
        }
    }
}

/// Move `source` to its resolved placement for `desired`.
///
/// A file already sitting at the fingerprint-suffixed name holds the same
/// content, so it is replaced by the rename.
///
/// # Errors
///
/// Returns [`ReorgError::Move`] if the rename fails.
pub fn move_into_place(
    source: &Path,
    desired: &Path,
    fingerprint: &Fingerprint,
) -> Result<Placement> {
    let placement = resolve_placement(desired, fingerprint);

    fs::rename(source, &placement.path).map_err(|e| ReorgError::Move {
        from: source.to_path_buf(),
        to: placement.path.clone(),
        source: e,
    })?;

    if placement.renamed {
        log::debug!(
            "Name collision at {}, moved {} to {}",
            desired.display(),
            source.display(),
            placement.path.display()
        );
    } else {
        log::trace!("Moved {} to {}", source.display(), placement.path.display());
    }

    Ok(placement)
}

/// Whether anything (file, directory or symlink) sits at `path`.
///
/// Errors other than "not found" count as occupied so a path we cannot
/// inspect is never written over.
fn occupied(path: &Path) -> bool {
    match fs::symlink_metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}
