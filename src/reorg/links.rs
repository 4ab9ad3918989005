//! Album link materialization.
//!
//! Every album member becomes a relative symlink under `Albums/<name>/`.
//! The symlink points at the canonical copy already in the index when
//! there is one; otherwise the member itself is moved into
//! `Album-only Photos/` and indexed, so later albums holding the same
//! content link to that one copy.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{ReorgError, Result};
use crate::scanner::{Hasher, SourceEntry};

use super::index::PhotoIndex;
use super::layout::TargetLayout;
use super::placement::move_into_place;
use super::{SkipReason, Tier};

/// What happened to one album member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The member was left in the source tree untouched.
    Skipped(SkipReason),
    /// A symlink was created.
    Linked {
        /// Whether the member was moved into `Album-only Photos/`
        materialized: bool,
        /// Whether that move needed a fingerprint-suffixed name
        renamed: bool,
    },
}

/// Creates album symlinks backed by the index.
#[derive(Debug)]
pub struct LinkMaterializer<'a> {
    layout: &'a TargetLayout,
    hasher: &'a Hasher,
}

impl<'a> LinkMaterializer<'a> {
    #[must_use]
    pub fn new(layout: &'a TargetLayout, hasher: &'a Hasher) -> Self {
        Self { layout, hasher }
    }

    /// Link one album member into `album_dir`.
    ///
    /// When the member's content is already indexed its source file is left
    /// where it is; the source tree is never processed twice, so the orphan
    /// is harmless.
    ///
    /// # Errors
    ///
    /// Fails on the first hashing, move, relative-path or symlink error.
    pub fn link_member(
        &self,
        index: &mut PhotoIndex,
        member: &SourceEntry,
        album_dir: &Path,
    ) -> Result<LinkOutcome> {
        if let Some(reason) = SkipReason::of(member) {
            return Ok(LinkOutcome::Skipped(reason));
        }

        let fingerprint = self.hasher.full_hash(&member.path)?;
        let link = album_dir.join(&member.name);

        let (backing, materialized, renamed) = match index.path(&fingerprint) {
            Some(existing) => (existing.to_path_buf(), false, false),
            None => {
                let desired = self.layout.album_only().join(&member.name);
                let placement = move_into_place(&member.path, &desired, &fingerprint)?;
                index.record(fingerprint, placement.path.clone(), Tier::AlbumOnly);
                (placement.path, true, placement.renamed)
            }
        };

        let target = relative_path(album_dir, &backing)?;
        create_symlink(&target, &link).map_err(|source| ReorgError::Symlink {
            link: link.clone(),
            target: target.clone(),
            source,
        })?;

        log::debug!("Linked {} -> {}", link.display(), target.display());
        Ok(LinkOutcome::Linked {
            materialized,
            renamed,
        })
    }
}

/// Compute the path of `to` relative to the directory `from_dir`.
///
/// Both paths are cleaned lexically (`.` dropped, `..` folded); the file
/// system is not consulted.
///
/// # Errors
///
/// Returns [`ReorgError::RelativePath`] if only one path is absolute, the
/// paths have different roots, or `from_dir` climbs above their common
/// prefix with `..`.
pub fn relative_path(from_dir: &Path, to: &Path) -> Result<PathBuf> {
    let err = || ReorgError::RelativePath {
        from: from_dir.to_path_buf(),
        to: to.to_path_buf(),
    };

    if from_dir.is_absolute() != to.is_absolute() {
        return Err(err());
    }

    let from = clean(from_dir);
    let to_parts = clean(to);

    let common = from
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if from_dir.is_absolute() && common == 0 {
        return Err(err());
    }

    let rest = &from[common..];
    if rest.contains(&Component::ParentDir) {
        return Err(err());
    }

    let mut relative = PathBuf::new();
    for _ in rest {
        relative.push(Component::ParentDir);
    }
    for part in &to_parts[common..] {
        relative.push(part);
    }

    if relative.as_os_str().is_empty() {
        relative.push(Component::CurDir);
    }
    Ok(relative)
}

/// Lexically clean a path into its components.
fn clean(path: &Path) -> Vec<Component<'_>> {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}
