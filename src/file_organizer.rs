//! Collision-safe file relocation.
//!
//! This module moves single files into a category folder. When the plain file
//! name is already taken in the destination folder, the incoming file is renamed
//! once by inserting a `_YYYYMMDD_HHMMSS` timestamp between stem and extension.
//! Moves work across filesystem boundaries by falling back to copy-then-delete.
//!
//! Failures never escape as errors: they are captured in a [`MoveOutcome`] so a
//! single bad file cannot abort a run.
use chrono::{Local, NaiveDateTime};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Timestamp layout inserted into colliding file names.
pub const COLLISION_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Errors that abort an organize run.
///
/// Per-file problems are not represented here; they become failed
/// [`MoveOutcome`]s instead.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create the destination root.
    #[error("Failed to create destination directory {}: {source}", .path.display())]
    DestinationCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The source tree could not be read.
    #[error("Failed to read source directory {}: {source}", .path.display())]
    WalkFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    /// The background worker running the organize pass panicked.
    #[error("Organize worker thread panicked")]
    WorkerPanicked,
}

/// Result type for organize runs.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Outcome of a single move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Whether the file now lives at `destination`.
    pub success: bool,
    /// Final destination path, after collision resolution.
    pub destination: PathBuf,
    /// Human-readable reason when the move failed.
    pub error: Option<String>,
}

impl MoveOutcome {
    fn moved(destination: PathBuf) -> Self {
        Self {
            success: true,
            destination,
            error: None,
        }
    }

    pub(crate) fn failed(destination: PathBuf, error: impl Into<String>) -> Self {
        Self {
            success: false,
            destination,
            error: Some(error.into()),
        }
    }
}

/// Moves files into category folders.
pub struct FileMover;

impl FileMover {
    /// Moves `source` into `destination_folder`, which must already exist.
    ///
    /// If a file with the same name is already present, the incoming file is
    /// renamed with the current local time (see [`COLLISION_STAMP_FORMAT`]).
    /// The new name is not re-checked: two same-named files arriving within the
    /// same second can still collide.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::file_organizer::FileMover;
    /// use std::path::Path;
    ///
    /// let outcome = FileMover::move_into(
    ///     Path::new("/path/to/inbox/report.pdf"),
    ///     Path::new("/path/to/sorted/Documents"),
    /// );
    /// if outcome.success {
    ///     println!("Now at {}", outcome.destination.display());
    /// }
    /// ```
    pub fn move_into(source: &Path, destination_folder: &Path) -> MoveOutcome {
        Self::move_into_at(source, destination_folder, Local::now().naive_local())
    }

    /// Same as [`FileMover::move_into`] with an explicit clock reading for the
    /// collision timestamp.
    pub fn move_into_at(
        source: &Path,
        destination_folder: &Path,
        now: NaiveDateTime,
    ) -> MoveOutcome {
        let Some(file_name) = source.file_name() else {
            return MoveOutcome::failed(
                destination_folder.to_path_buf(),
                "file has no name component",
            );
        };

        let mut destination = destination_folder.join(file_name);
        if is_occupied(&destination) {
            let stamp = now.format(COLLISION_STAMP_FORMAT).to_string();
            destination = destination_folder.join(timestamped_name(file_name, &stamp));
            debug!(
                src = %source.display(),
                dest = %destination.display(),
                "destination name taken, using timestamped name"
            );
        }

        match relocate(source, &destination) {
            Ok(()) => {
                debug!(src = %source.display(), dest = %destination.display(), "moved file");
                MoveOutcome::moved(destination)
            }
            Err(e) => MoveOutcome::failed(destination, e.to_string()),
        }
    }
}

/// Inserts `_<stamp>` between the stem and extension of `file_name`.
///
/// # Examples
///
/// ```
/// use sortdir::file_organizer::timestamped_name;
/// use std::ffi::OsStr;
///
/// assert_eq!(
///     timestamped_name(OsStr::new("report.pdf"), "20240131_153045"),
///     "report_20240131_153045.pdf"
/// );
/// assert_eq!(
///     timestamped_name(OsStr::new("Makefile"), "20240131_153045"),
///     "Makefile_20240131_153045"
/// );
/// ```
pub fn timestamped_name(file_name: &OsStr, stamp: &str) -> OsString {
    let as_path = Path::new(file_name);
    let stem = as_path.file_stem().unwrap_or(file_name);

    let mut renamed = OsString::from(stem);
    renamed.push("_");
    renamed.push(stamp);
    if let Some(ext) = as_path.extension() {
        renamed.push(".");
        renamed.push(ext);
    }
    renamed
}

/// A dangling symlink still occupies a name.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(src = %source.display(), "cross-device move, copying instead");
            copy_then_remove(source, destination)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    copy_then(source, destination, |path| fs::remove_file(path))
}

/// Copies `source` to `destination`, then removes the source with
/// `remove_source`. On any failure the copy is discarded so exactly one
/// file is left behind.
fn copy_then<F>(source: &Path, destination: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if let Err(e) = fs::copy(source, destination) {
        // a partial copy may exist
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    if let Err(e) = remove_source(source) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}
