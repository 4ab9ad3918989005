//! Content-addressed reorganization of an exported photo library.
//!
//! # Overview
//!
//! The pipeline runs once per invocation and shares one [`PhotoIndex`]
//! between its passes:
//! 1. **Main pass**: move every photo from the `Photos from YYYY` folders into
//!    `Photos/` and index it by fingerprint
//! 2. **Archive pass**: move every archived photo into `Archive/`, indexing it
//!    only when the main tree did not already provide the same content
//! 3. **Album pass**: turn every album member into a relative symlink under
//!    `Albums/<name>/`, materializing content seen nowhere else into
//!    `Album-only Photos/`
//!
//! # Precedence
//!
//! Which physical copy becomes the canonical target for a fingerprint is
//! decided by [`Tier`]: `Main` beats `Archive` beats `AlbumOnly`. Across
//! tiers the index is first-writer-wins, and it refuses to start a pass of
//! higher precedence after one of lower precedence, so the passes must run
//! in tier order. Inside the main tier the last copy processed wins.
//!
//! # Example
//!
//! ```no_run
//! use takeout_reorg::reorg::{PhotoIndex, Reconciler, SourceLayout, TargetLayout};
//! use std::path::Path;
//!
//! let source = SourceLayout::new(Path::new("Takeout"), "Google Photos");
//! let target = TargetLayout::new(Path::new("Library")).unwrap();
//! let mut index = PhotoIndex::new();
//!
//! let summary = Reconciler::new(source, target, &mut index).run().unwrap();
//! println!("{} album links created", summary.album_links);
//! ```

pub mod index;
pub mod layout;
pub mod links;
pub mod placement;
pub mod reconciler;

use std::fmt;

use serde::Serialize;

use crate::scanner::{SourceCategory, SourceEntry};

pub use index::{IndexEntry, PhotoIndex};
pub use layout::{ensure_dir, SourceLayout, TargetLayout};
pub use links::{relative_path, LinkMaterializer, LinkOutcome};
pub use placement::{collision_path, move_into_place, resolve_placement, Placement};
pub use reconciler::Reconciler;

/// Which store a fingerprint's canonical file lives in.
///
/// The derived ordering is the precedence order: earlier tiers win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    /// `Photos/`, filled from the year folders.
    Main,
    /// `Archive/`, filled from the archive folder.
    Archive,
    /// `Album-only Photos/`, filled from album members seen nowhere else.
    AlbumOnly,
}

impl Tier {
    /// All tiers in precedence order.
    pub const ALL: [Tier; 3] = [Tier::Main, Tier::Archive, Tier::AlbumOnly];
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Archive => "archive",
            Self::AlbumOnly => "album-only",
        };
        f.write_str(name)
    }
}

/// Why an entry inside a category folder was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Sidecar metadata file, never read
    Sidecar,
    /// Nested directory, never descended into
    NestedDir,
}

impl SkipReason {
    /// Whether `entry` is skipped, and why. `None` means it is a photo.
    #[must_use]
    pub fn of(entry: &SourceEntry) -> Option<Self> {
        if entry.is_dir {
            Some(Self::NestedDir)
        } else if SourceCategory::classify(&entry.lossy_name(), false) == Some(SourceCategory::Sidecar) {
            Some(Self::Sidecar)
        } else {
            None
        }
    }
}

/// Counts of what a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReorgSummary {
    /// Photos moved from year folders into `Photos/`
    pub main_photos: usize,
    /// Photos moved from the archive into `Archive/`
    pub archive_photos: usize,
    /// Archived photos whose content was already indexed from the main tree
    pub archive_duplicates: usize,
    /// Album directories created under `Albums/`
    pub albums: usize,
    /// Symlinks created under `Albums/`
    pub album_links: usize,
    /// Album members moved into `Album-only Photos/`
    pub album_only_photos: usize,
    /// Moves that needed a fingerprint-suffixed name
    pub collision_renames: usize,
    /// Sidecar metadata files left untouched
    pub skipped_sidecars: usize,
    /// Nested directories inside category folders left untouched
    pub skipped_dirs: usize,
    /// Distinct fingerprints in the index at the end of the run
    pub indexed: usize,
}

impl ReorgSummary {
    pub(crate) fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Sidecar => self.skipped_sidecars += 1,
            SkipReason::NestedDir => self.skipped_dirs += 1,
        }
    }
}

impl fmt::Display for ReorgSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} main photos, {} archived ({} also in main), {} albums with {} links, \
             {} album-only photos, {} collision renames",
            self.main_photos,
            self.archive_photos,
            self.archive_duplicates,
            self.albums,
            self.album_links,
            self.album_only_photos,
            self.collision_renames
        )
    }
}
