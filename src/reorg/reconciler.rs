//! Three-pass reconciliation of the source tree into the target layout.
//!
//! The passes run strictly in [`Tier`] order because each one consults the
//! index built by the ones before it:
//!
//! | Pass    | Source folders        | Destination           | Indexes             |
//! |---------|-----------------------|-----------------------|---------------------|
//! | main    | `Photos from YYYY/*`  | `Photos/`             | every photo         |
//! | archive | `Archive/*`           | `Archive/`            | unseen content only |
//! | albums  | every other folder    | `Albums/<name>/` link | album-only content  |
//!
//! `Trash` is never touched. Archived photos are always physically moved,
//! even when the main tree already holds the same content, so `Archive/`
//! keeps a full copy of everything that was archived.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::progress::ProgressCallback;
use crate::scanner::{folder_year, list_entries, Hasher, SourceCategory, SourceEntry};

use super::index::PhotoIndex;
use super::layout::{ensure_dir, SourceLayout, TargetLayout};
use super::links::{LinkMaterializer, LinkOutcome};
use super::placement::move_into_place;
use super::{ReorgSummary, SkipReason, Tier};

/// Moves and links one export into a target layout.
pub struct Reconciler<'a> {
    source: SourceLayout,
    layout: TargetLayout,
    index: &'a mut PhotoIndex,
    hasher: Hasher,
    progress: Option<Arc<dyn ProgressCallback>>,
    summary: ReorgSummary,
}

impl std::fmt::Debug for Reconciler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("source", &self.source)
            .field("layout", &self.layout)
            .field("index", &self.index)
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .field("summary", &self.summary)
            .finish()
    }
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler writing into `layout` and recording into `index`.
    #[must_use]
    pub fn new(source: SourceLayout, layout: TargetLayout, index: &'a mut PhotoIndex) -> Self {
        Self {
            source,
            layout,
            index,
            hasher: Hasher::new(),
            progress: None,
            summary: ReorgSummary::default(),
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Run all three passes in precedence order.
    ///
    /// # Errors
    ///
    /// Stops at the first failure. Files moved before it stay moved.
    pub fn run(mut self) -> Result<ReorgSummary> {
        let top_level = list_entries(self.source.root())?;

        log::info!("Moving and indexing main-directory photos...");
        self.main_pass(&top_level)?;

        log::info!("Moving archive...");
        self.archive_pass()?;

        log::info!("Moving albums...");
        self.album_pass(&top_level)?;

        self.summary.indexed = self.index.len();
        Ok(self.summary)
    }

    /// Move every photo in the year folders into `Photos/` and index it.
    ///
    /// If two year folders hold the same content, both copies are moved and
    /// the one processed last becomes the index entry.
    ///
    /// # Errors
    ///
    /// Fails on the first listing, hashing or move error.
    pub fn main_pass(&mut self, top_level: &[SourceEntry]) -> Result<()> {
        self.index.begin_pass(Tier::Main)?;
        ensure_dir(self.layout.photos())?;

        let mut members = Vec::new();
        for folder in folders_of(top_level, |c| c == SourceCategory::YearFolder) {
            log::debug!(
                "Year folder {} ({:?})",
                folder.lossy_name(),
                folder_year(&folder.lossy_name())
            );
            members.extend(list_entries(&folder.path)?);
        }

        self.start_pass(Tier::Main, members.len());
        for (i, member) in members.iter().enumerate() {
            self.report(i + 1, member);
            if self.skip(member) {
                continue;
            }

            let fingerprint = self.hasher.full_hash(&member.path)?;
            let desired = self.layout.photos().join(&member.name);
            let placement = move_into_place(&member.path, &desired, &fingerprint)?;

            self.summary.main_photos += 1;
            self.summary.collision_renames += usize::from(placement.renamed);
            if let Some(previous) = self.index.record_main(fingerprint, placement.path) {
                log::trace!("Main-tree duplicate replaces {}", previous.display());
            }
        }
        self.end_pass(Tier::Main);

        Ok(())
    }

    /// Move every archived photo into `Archive/`.
    ///
    /// Content already indexed by the main pass keeps its main entry; the
    /// archived copy is moved all the same.
    ///
    /// # Errors
    ///
    /// Fails if the archive folder is missing, or on the first hashing or
    /// move error.
    pub fn archive_pass(&mut self) -> Result<()> {
        self.index.begin_pass(Tier::Archive)?;
        ensure_dir(self.layout.archive())?;

        let members = list_entries(&self.source.archive_dir())?;

        self.start_pass(Tier::Archive, members.len());
        for (i, member) in members.iter().enumerate() {
            self.report(i + 1, member);
            if self.skip(member) {
                continue;
            }

            let fingerprint = self.hasher.full_hash(&member.path)?;
            let desired = self.layout.archive().join(&member.name);
            let placement = move_into_place(&member.path, &desired, &fingerprint)?;

            self.summary.archive_photos += 1;
            self.summary.collision_renames += usize::from(placement.renamed);
            if !self
                .index
                .record(fingerprint, placement.path.clone(), Tier::Archive)
            {
                log::debug!(
                    "Archived {} duplicates an indexed photo",
                    placement.path.display()
                );
                self.summary.archive_duplicates += 1;
            }
        }
        self.end_pass(Tier::Archive);

        Ok(())
    }

    /// Turn every album member into a symlink under `Albums/<name>/`.
    ///
    /// Every album is listed before any album directory is created, so a
    /// listing failure leaves no album directories behind. Nothing is
    /// rolled back once linking has started.
    ///
    /// # Errors
    ///
    /// Fails on the first listing, directory creation, hashing, move,
    /// relative-path or symlink error.
    pub fn album_pass(&mut self, top_level: &[SourceEntry]) -> Result<()> {
        self.index.begin_pass(Tier::AlbumOnly)?;
        ensure_dir(self.layout.album_only())?;
        ensure_dir(self.layout.albums())?;

        let mut albums: Vec<(&SourceEntry, Vec<SourceEntry>)> = Vec::new();
        for folder in folders_of(top_level, |c| c == SourceCategory::Album) {
            albums.push((folder, list_entries(&folder.path)?));
        }

        let total = albums.iter().map(|(_, members)| members.len()).sum();
        self.start_pass(Tier::AlbumOnly, total);

        let mut current = 0;
        for (album, members) in &albums {
            let album_dir: PathBuf = self.layout.album_dir(&album.name);
            ensure_dir(&album_dir)?;
            self.summary.albums += 1;
            log::debug!("Album {} ({} entries)", album.lossy_name(), members.len());

            let materializer = LinkMaterializer::new(&self.layout, &self.hasher);
            for member in members {
                current += 1;
                if let Some(ref cb) = self.progress {
                    cb.on_progress(current, &member.path.to_string_lossy());
                }

                match materializer.link_member(self.index, member, &album_dir)? {
                    LinkOutcome::Skipped(reason) => self.summary.count_skip(reason),
                    LinkOutcome::Linked {
                        materialized,
                        renamed,
                    } => {
                        self.summary.album_links += 1;
                        self.summary.album_only_photos += usize::from(materialized);
                        self.summary.collision_renames += usize::from(renamed);
                    }
                }
            }
        }
        self.end_pass(Tier::AlbumOnly);

        Ok(())
    }

    fn skip(&mut self, member: &SourceEntry) -> bool {
        match SkipReason::of(member) {
            Some(reason) => {
                log::trace!("Skipping {} ({:?})", member.path.display(), reason);
                self.summary.count_skip(reason);
                true
            }
            None => false,
        }
    }

    fn start_pass(&self, pass: Tier, total: usize) {
        log::debug!("Starting {} pass over {} entries", pass, total);
        if let Some(ref cb) = self.progress {
            cb.on_pass_start(pass, total);
        }
    }

    fn report(&self, current: usize, member: &SourceEntry) {
        if let Some(ref cb) = self.progress {
            cb.on_progress(current, &member.path.to_string_lossy());
        }
    }

    fn end_pass(&self, pass: Tier) {
        if let Some(ref cb) = self.progress {
            cb.on_pass_end(pass);
        }
    }
}

/// Top-level directories whose category satisfies `keep`.
fn folders_of<F>(top_level: &[SourceEntry], keep: F) -> impl Iterator<Item = &SourceEntry>
where
    F: Fn(SourceCategory) -> bool,
{
    top_level.iter().filter(move |entry| {
        entry.is_dir && SourceCategory::classify(&entry.lossy_name(), true).is_some_and(&keep)
    })
}
