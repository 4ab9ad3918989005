//! Fingerprint to canonical-location index.
//!
//! The index only grows during a run, and every path it holds is a real
//! file that exists on disk for the rest of the run. Duplicates within the
//! main tree move the entry to the copy processed last; once the main pass
//! is over an entry never changes, and later passes that see the
//! fingerprint link to it instead of overwriting it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ReorgError, Result};
use crate::scanner::Fingerprint;

use super::Tier;

/// Where the canonical copy of a fingerprint lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Absolute path of the real file
    pub path: PathBuf,
    /// Store the file was placed in
    pub tier: Tier,
}

/// Map from fingerprint to canonical file.
///
/// Across tiers the first writer wins; inside the main tier the last one
/// does (see [`PhotoIndex::record_main`]).
///
/// The index is owned by the caller and lent to the reconciler, so a later
/// parallel implementation can swap in a synchronized variant without
/// touching the passes themselves.
#[derive(Debug, Default)]
pub struct PhotoIndex {
    entries: HashMap<Fingerprint, IndexEntry>,
    current_pass: Option<Tier>,
}

impl PhotoIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a pass.
    ///
    /// Passes must start in precedence order; re-entering the current pass
    /// is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ReorgError::PassOrder`] if a pass of lower precedence has
    /// already started.
    pub fn begin_pass(&mut self, pass: Tier) -> Result<()> {
        match self.current_pass {
            Some(current) if current > pass => Err(ReorgError::PassOrder {
                current,
                requested: pass,
            }),
            _ => {
                self.current_pass = Some(pass);
                Ok(())
            }
        }
    }

    /// The most recently started pass.
    #[must_use]
    pub fn current_pass(&self) -> Option<Tier> {
        self.current_pass
    }

    /// Record `path` as the canonical file for `fingerprint`.
    ///
    /// Returns `true` if the entry was inserted, `false` if the fingerprint
    /// was already indexed (the existing entry is kept).
    pub fn record(&mut self, fingerprint: Fingerprint, path: PathBuf, tier: Tier) -> bool {
        use std::collections::hash_map::Entry;

        match self.entries.entry(fingerprint) {
            Entry::Occupied(existing) => {
                log::trace!(
                    "Keeping {} for {}, ignoring {}",
                    existing.get().path.display(),
                    existing.key(),
                    path.display()
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(IndexEntry { path, tier });
                true
            }
        }
    }

    /// Record `path` as the main-tree file for `fingerprint`, replacing any
    /// earlier main-tree entry.
    ///
    /// Within the main pass the last copy processed is canonical. Only the
    /// main pass calls this, before any later tier has recorded anything.
    /// Returns the replaced path, if any.
    pub fn record_main(&mut self, fingerprint: Fingerprint, path: PathBuf) -> Option<PathBuf> {
        let previous = self.entries.insert(
            fingerprint,
            IndexEntry {
                path,
                tier: Tier::Main,
            },
        )?;
        Some(previous.path)
    }

    /// Look up the canonical entry for a fingerprint.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&IndexEntry> {
        self.entries.get(fingerprint)
    }

    /// Look up the canonical path for a fingerprint.
    #[must_use]
    pub fn path(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.get(fingerprint).map(|entry| entry.path.as_path())
    }

    /// Whether the fingerprint is indexed.
    #[must_use]
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries.contains_key(fingerprint)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been indexed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
