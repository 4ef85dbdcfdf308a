//! Post-run pruning of emptied source directories.
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Removes empty directories below `root`, deepest first.
///
/// The root itself is never removed. A directory that still holds anything,
/// hidden entries included, is left alone, and every removal error is ignored:
/// this pass only tidies up and never fails a run. Returns how many directories
/// were removed.
pub fn prune_empty_dirs(root: &Path) -> usize {
    let mut removed = 0;

    let dirs = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir());

    for dir in dirs {
        // remove_dir only succeeds on empty directories
        if fs::remove_dir(dir.path()).is_ok() {
            debug!(path = %dir.path().display(), "removed empty directory");
            removed += 1;
        }
    }

    removed
}
