//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display one progress bar per reconciliation pass.

use std::sync::{Mutex, MutexGuard};

use indicatif::{ProgressBar, ProgressStyle};

use crate::reorg::Tier;

/// Progress callback for reconciliation passes.
///
/// Implement this trait to receive progress updates while the
/// reconciler moves and links files.
pub trait ProgressCallback: Send + Sync {
    /// Called when a pass starts.
    ///
    /// # Arguments
    ///
    /// * `pass` - The pass being started
    /// * `total` - Number of source entries the pass will visit
    fn on_pass_start(&self, pass: Tier, total: usize);

    /// Called for each entry visited.
    ///
    /// # Arguments
    ///
    /// * `current` - Current entry number (1-based)
    /// * `path` - Source path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a pass completes.
    fn on_pass_end(&self, pass: Tier);
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use takeout_reorg::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        // A poisoned bar is still safe to draw to.
        self.bar.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ProgressCallback for Progress {
    fn on_pass_start(&self, pass: Tier, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message(format!("{pass} pass"));
        if let Some(previous) = self.bar().replace(pb) {
            previous.finish_and_clear();
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Some(ref pb) = *self.bar() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_pass_end(&self, pass: Tier) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.bar().take() {
            pb.finish_with_message(format!("{pass} pass complete"));
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
