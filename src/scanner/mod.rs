//! Scanner module for source classification, listing and file hashing.
//!
//! This module provides functionality for:
//! - Classifying the top-level folders of an export (year folders, archive,
//!   trash, albums) and spotting sidecar metadata files
//! - Flat, name-sorted listing of a directory
//! - Content hashing with SHA-256
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Sorted single-level directory listing
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use takeout_reorg::scanner::{list_entries, SourceCategory};
//! use std::path::Path;
//!
//! for entry in list_entries(Path::new("Takeout/Google Photos")).unwrap() {
//!     let category = SourceCategory::classify(&entry.lossy_name(), entry.is_dir);
//!     println!("{}: {:?}", entry.lossy_name(), category);
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

// Re-export main types
pub use hasher::{Fingerprint, Hasher, FINGERPRINT_LEN, HASH_BUFFER_SIZE};
pub use walker::list_entries;

/// Name of the archive folder in the export.
pub const ARCHIVE_DIR_NAME: &str = "Archive";

/// Name of the trash folder in the export.
pub const TRASH_DIR_NAME: &str = "Trash";

/// Extension suffix of sidecar metadata files.
pub const SIDECAR_SUFFIX: &str = ".json";

static YEAR_FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Photos from (\d{4})").expect("year folder pattern is valid"));

/// One entry of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// File name, byte for byte as on disk
    pub name: OsString,
    /// Full path to the entry
    pub path: PathBuf,
    /// Whether the entry is a directory (symlinks are not followed)
    pub is_dir: bool,
}

impl SourceEntry {
    /// The file name as UTF-8, with invalid sequences replaced.
    ///
    /// For classification and log output only; target paths are always
    /// built from [`SourceEntry::name`].
    #[must_use]
    pub fn lossy_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }
}

/// What a source entry is, as far as reorganization is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    /// A `Photos from YYYY` folder holding the main photo tree.
    YearFolder,
    /// The `Archive` folder.
    Archive,
    /// The `Trash` folder, never processed.
    Trash,
    /// Any other top-level folder.
    Album,
    /// A `.json` sidecar metadata file, never read.
    Sidecar,
}

impl SourceCategory {
    /// Classify an entry by name.
    ///
    /// Directories always get a category. Files only get one when they are
    /// sidecars; every other file is a photo and returns `None`.
    #[must_use]
    pub fn classify(name: &str, is_dir: bool) -> Option<Self> {
        if !is_dir {
            return is_sidecar(name).then_some(Self::Sidecar);
        }

        let category = if YEAR_FOLDER_RE.is_match(name) {
            Self::YearFolder
        } else if name == ARCHIVE_DIR_NAME {
            Self::Archive
        } else if name == TRASH_DIR_NAME {
            Self::Trash
        } else {
            Self::Album
        };
        Some(category)
    }
}

/// Whether `name` is a sidecar metadata file.
#[must_use]
pub fn is_sidecar(name: &str) -> bool {
    name.ends_with(SIDECAR_SUFFIX)
}

/// Extract the year from a `Photos from YYYY` folder name.
#[must_use]
pub fn folder_year(name: &str) -> Option<u16> {
    YEAR_FOLDER_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
