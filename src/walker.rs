//! Recursive enumeration of the files to organize.
//!
//! Hidden entries (names starting with `.`) are pruned at every level, so a
//! hidden directory is never descended into. The root itself is exempt: a
//! source folder called `.inbox` is still walked.
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Returns true if a file or directory name follows the hidden-entry convention.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.')
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(is_hidden_name)
}

/// Lists every visible regular file under `root` as an absolute path.
///
/// Entries are visited in file-name order within each directory, so the result
/// is stable for a given filesystem snapshot. Symlinks are neither followed nor
/// listed, whether they point at a file or a directory.
///
/// # Errors
///
/// Returns [`OrganizeError::WalkFailed`] if `root` cannot be read, including
/// when it does not exist. Unreadable subdirectories are skipped with a warning.
///
/// # Examples
///
/// ```no_run
/// use sortdir::walker::enumerate;
/// use std::path::Path;
///
/// for file in enumerate(Path::new("/path/to/inbox")).unwrap_or_default() {
///     println!("{}", file.display());
/// }
/// ```
pub fn enumerate(root: &Path) -> OrganizeResult<Vec<PathBuf>> {
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let mut files = Vec::new();

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(OrganizeError::WalkFailed {
                    path: root.clone(),
                    source: e,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        } else if entry.path_is_symlink() {
            debug!(path = %entry.path().display(), "skipping symlink");
        }
    }

    Ok(files)
}
