//! Source and target directory layouts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ReorgError, Result};
use crate::scanner::ARCHIVE_DIR_NAME;

/// Default name of the export's photo root under the source directory.
pub const DEFAULT_SOURCE_ROOT_DIR: &str = "Google Photos";

/// Canonical photo store, filled from the year folders.
pub const PHOTOS_DIR: &str = "Photos";
/// Archive store, a full physical copy of everything archived.
pub const ARCHIVE_DIR: &str = "Archive";
/// Store for album members found nowhere else.
pub const ALBUM_ONLY_DIR: &str = "Album-only Photos";
/// Per-album directories of symlinks.
pub const ALBUMS_DIR: &str = "Albums";

/// Where the export lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    root: PathBuf,
}

impl SourceLayout {
    /// Layout for `<source>/<root_dir>`.
    #[must_use]
    pub fn new(source: &Path, root_dir: &str) -> Self {
        Self {
            root: source.join(root_dir),
        }
    }

    /// The directory holding year folders, the archive and albums.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The archive folder.
    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR_NAME)
    }
}

/// The four destination directories under the target root.
///
/// All paths are absolute so relative symlink targets can be computed
/// lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    root: PathBuf,
    photos: PathBuf,
    archive: PathBuf,
    album_only: PathBuf,
    albums: PathBuf,
}

impl TargetLayout {
    /// Build the layout under `target`, made absolute against the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the current directory cannot be determined.
    pub fn new(target: &Path) -> io::Result<Self> {
        let root = std::path::absolute(target)?;
        Ok(Self {
            photos: root.join(PHOTOS_DIR),
            archive: root.join(ARCHIVE_DIR),
            album_only: root.join(ALBUM_ONLY_DIR),
            albums: root.join(ALBUMS_DIR),
            root,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn photos(&self) -> &Path {
        &self.photos
    }

    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    #[must_use]
    pub fn album_only(&self) -> &Path {
        &self.album_only
    }

    #[must_use]
    pub fn albums(&self) -> &Path {
        &self.albums
    }

    /// Target directory for one album.
    #[must_use]
    pub fn album_dir(&self, album: impl AsRef<Path>) -> PathBuf {
        self.albums.join(album)
    }

    /// Directories holding real files, in post-processing order.
    ///
    /// `Albums/` is not included: it only holds symlinks.
    #[must_use]
    pub fn real_file_dirs(&self) -> [&Path; 3] {
        [&self.photos, &self.archive, &self.album_only]
    }
}

/// Create `dir` and its parents; an existing directory is not an error.
///
/// # Errors
///
/// Returns [`ReorgError::CreateDir`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| ReorgError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}
