//! Organize runs: enumerate, classify, move, report, prune.
//!
//! An [`Organizer`] drives one run from a source tree into a destination
//! directory. Progress and activity lines are pushed through two plain
//! callbacks, invoked in order on the thread executing the run. [`spawn`]
//! executes a run on a worker thread and forwards those callbacks over a
//! channel instead.
//!
//! A run consumes its input: files that were moved have left the source tree,
//! so running again after a partial failure only sees what is left.
use crate::cleanup;
use crate::file_category::{Category, CategoryTable};
use crate::file_organizer::{FileMover, MoveOutcome, OrganizeError, OrganizeResult};
use crate::walker;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Aggregate outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Files that now live in the destination.
    pub moved: usize,
    /// Files whose move failed; they are still in the source tree.
    pub failed: usize,
    /// Reserved for filtering; never incremented today.
    pub skipped: usize,
    /// Number of moved files per category name.
    pub categories: HashMap<String, usize>,
    /// True when the run stopped early because its cancel flag was raised.
    pub cancelled: bool,
}

impl RunStats {
    fn record_moved(&mut self, category: &Category) {
        self.moved += 1;
        *self.categories.entry(category.name().to_string()).or_insert(0) += 1;
    }

    /// Files processed so far, moved or failed.
    pub fn processed(&self) -> usize {
        self.moved + self.failed
    }

    /// Categories by descending count, ties broken by name.
    pub fn sorted_categories(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self
            .categories
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

/// Notification emitted by a run executing on a worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// One human-readable activity line.
    Log(String),
    /// Percentage of files processed, 0..=100.
    Progress(u8),
}

/// Shared stop flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the run to stop before its next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A file and the category it would be moved into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub category: &'static Category,
}

/// Drives organize runs from one source tree into one destination.
///
/// Only one run should target a given source/destination pair at a time;
/// serializing runs is up to the caller.
#[derive(Debug, Clone)]
pub struct Organizer {
    source: PathBuf,
    destination: PathBuf,
    table: &'static CategoryTable,
    cancel: CancelFlag,
}

impl Organizer {
    /// Creates an organizer using the built-in category table.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            table: CategoryTable::standard(),
            cancel: CancelFlag::new(),
        }
    }

    /// Uses `flag` to stop the run early.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Executes one run.
    ///
    /// `on_log` receives one line per notable action (one per file, plus
    /// header and warnings). `on_progress` is called once per processed file
    /// with a non-decreasing percentage that reaches 100 on the last file.
    ///
    /// A missing source is reported through `on_log` and yields empty stats
    /// without touching the destination. Per-file failures are logged and
    /// counted, never returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be created or the source root
    /// cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdir::organizer::Organizer;
    ///
    /// let stats = Organizer::new("/path/to/inbox", "/path/to/sorted")
    ///     .run(|line| println!("{line}"), |pct| eprintln!("{pct}%"))
    ///     .expect("destination should be writable");
    /// println!("moved {} file(s)", stats.moved);
    /// ```
    pub fn run<L, P>(&self, mut on_log: L, mut on_progress: P) -> OrganizeResult<RunStats>
    where
        L: FnMut(&str),
        P: FnMut(u8),
    {
        let mut stats = RunStats::default();

        if !self.source.is_dir() {
            let line = if self.source.exists() {
                format!("✗ Source is not a folder: {}", self.source.display())
            } else {
                format!("✗ Source folder does not exist: {}", self.source.display())
            };
            debug!(source = %self.source.display(), "source folder unavailable");
            on_log(&line);
            return Ok(stats);
        }

        fs::create_dir_all(&self.destination).map_err(|e| {
            OrganizeError::DestinationCreationFailed {
                path: self.destination.clone(),
                source: e,
            }
        })?;

        let files = walker::enumerate(&self.source)?;
        let total = files.len();
        if total == 0 {
            on_log("⚠ No files found in source folder.");
            return Ok(stats);
        }

        info!(
            source = %self.source.display(),
            destination = %self.destination.display(),
            total,
            "organize run started"
        );
        on_log(&format!("Found {total} file(s) to organize..."));

        for (index, file) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                on_log(&format!("⚠ Cancelled after {index} of {total} file(s)."));
                break;
            }

            let category = self.table.classify_path(file);
            let outcome = self.move_into_category(file, category);
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if outcome.success {
                stats.record_moved(category);
                on_log(&format!("✓ Moved: {name} → {}", category.display_label()));
            } else {
                stats.failed += 1;
                let reason = outcome.error.as_deref().unwrap_or("unknown error");
                debug!(file = %file.display(), error = reason, "move failed");
                on_log(&format!("✗ Error moving {name}: {reason}"));
            }

            on_progress(progress_percent(index + 1, total));
        }

        let pruned = cleanup::prune_empty_dirs(&self.source);
        info!(
            processed = stats.processed(),
            moved = stats.moved,
            failed = stats.failed,
            pruned,
            cancelled = stats.cancelled,
            "organize run finished"
        );

        Ok(stats)
    }

    /// Lists what a run would do without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root cannot be read.
    pub fn plan(&self) -> OrganizeResult<Vec<PlannedMove>> {
        let files = walker::enumerate(&self.source)?;
        Ok(files
            .into_iter()
            .map(|source| PlannedMove {
                category: self.table.classify_path(&source),
                source,
            })
            .collect())
    }

    fn move_into_category(&self, file: &Path, category: &Category) -> MoveOutcome {
        let folder = self.destination.join(category.name());
        match fs::create_dir_all(&folder) {
            Ok(()) => FileMover::move_into(file, &folder),
            Err(e) => MoveOutcome::failed(
                folder.clone(),
                format!("cannot create folder {}: {e}", folder.display()),
            ),
        }
    }
}

/// Runs [`Organizer::run`] with plain callbacks.
pub fn organize<L, P>(
    source: &Path,
    destination: &Path,
    on_log: L,
    on_progress: P,
) -> OrganizeResult<RunStats>
where
    L: FnMut(&str),
    P: FnMut(u8),
{
    Organizer::new(source, destination).run(on_log, on_progress)
}

/// `round(done / total * 100)`.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// A run executing on a worker thread.
pub struct RunHandle {
    events: Receiver<RunEvent>,
    worker: JoinHandle<OrganizeResult<RunStats>>,
}

impl RunHandle {
    /// Events in emission order. Iteration ends once the run is over.
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// Waits for the run to finish.
    pub fn join(self) -> OrganizeResult<RunStats> {
        drop(self.events);
        self.worker
            .join()
            .map_err(|_| OrganizeError::WorkerPanicked)?
    }
}

/// Starts `organizer` on a worker thread, forwarding its callbacks as [`RunEvent`]s.
pub fn spawn(organizer: Organizer) -> RunHandle {
    let (tx, events) = mpsc::channel();
    let worker = thread::spawn(move || {
        let log_tx = tx.clone();
        organizer.run(
            |line| {
                let _ = log_tx.send(RunEvent::Log(line.to_string()));
            },
            |percent| {
                let _ = tx.send(RunEvent::Progress(percent));
            },
        )
    });
    RunHandle { events, worker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_collecting(organizer: &Organizer) -> (RunStats, Vec<String>, Vec<u8>) {
        let mut logs = Vec::new();
        let mut progress = Vec::new();
        let stats = organizer
            .run(|l| logs.push(l.to_string()), |p| progress.push(p))
            .expect("run should succeed");
        (stats, logs, progress)
    }

    #[test]
    fn test_progress_percent_rounds() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(1, 200), 1);
        assert_eq!(progress_percent(1, 201), 0);
    }

    #[test]
    fn test_sorted_categories() {
        let mut stats = RunStats::default();
        stats.categories.insert("Photos".into(), 2);
        stats.categories.insert("Code".into(), 2);
        stats.categories.insert("Audios".into(), 5);
        assert_eq!(
            stats.sorted_categories(),
            vec![("Audios", 5), ("Code", 2), ("Photos", 2)]
        );
    }

    #[test]
    fn test_run_moves_and_reports() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();
        fs::write(src.join("sub/b.txt"), "b").unwrap();
        fs::write(src.join("c.weird"), "c").unwrap();

        let (stats, logs, progress) = run_collecting(&Organizer::new(&src, &dst));

        assert_eq!(stats.moved, 3);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.categories.get("Photos"), Some(&1));
        assert_eq!(stats.categories.get("Documents"), Some(&1));
        assert_eq!(stats.categories.get("Others"), Some(&1));
        assert_eq!(progress, vec![33, 67, 100]);
        assert_eq!(logs.len(), 4);
        assert!(logs[0].starts_with("Found 3 file(s)"));
        assert!(dst.join("Documents/b.txt").exists());
        assert!(!src.join("sub").exists(), "emptied subdirectory should be pruned");
        assert!(src.exists());
    }

    #[test]
    fn test_run_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dst = temp_dir.path().join("dst");

        let (stats, logs, progress) =
            run_collecting(&Organizer::new(temp_dir.path().join("nope"), &dst));

        assert_eq!(stats, RunStats::default());
        assert_eq!(logs.len(), 1);
        assert!(logs[0].contains("does not exist"));
        assert!(progress.is_empty());
        assert!(!dst.exists());
    }

    #[test]
    fn test_run_source_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let (stats, logs, _) = run_collecting(&Organizer::new(&file, temp_dir.path().join("d")));

        assert_eq!(stats.processed(), 0);
        assert!(logs[0].contains("not a folder"));
        assert!(file.exists());
    }

    #[test]
    fn test_run_empty_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();

        let (stats, logs, progress) = run_collecting(&Organizer::new(&src, &dst));

        assert_eq!(stats, RunStats::default());
        assert_eq!(logs, vec!["⚠ No files found in source folder.".to_string()]);
        assert!(progress.is_empty());
        assert!(dst.is_dir(), "destination is created before enumeration");
    }

    #[test]
    fn test_run_category_folder_blocked_counts_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        // a plain file squatting on the category folder name
        fs::write(dst.join("Photos"), "not a dir").unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();
        fs::write(src.join("b.txt"), "b").unwrap();

        let (stats, logs, progress) = run_collecting(&Organizer::new(&src, &dst));

        assert_eq!(stats.moved, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.categories.values().sum::<usize>(), stats.moved);
        assert!(logs.iter().any(|l| l.starts_with("✗ Error moving a.jpg")));
        assert_eq!(progress.last(), Some(&100));
        assert!(src.join("a.jpg").exists());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let Ok(mut inner) = self.0.lock() {
                inner.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_moves_stay_quiet_at_default_filter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(dst.join("Photos"), "not a dir").unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();

        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let (stats, logs, _) = tracing::subscriber::with_default(subscriber, || {
            run_collecting(&Organizer::new(&src, &dst))
        });

        assert_eq!(stats.failed, 1);
        assert!(logs.iter().any(|l| l.starts_with("✗ Error moving a.jpg")));
        let diagnostics = captured.0.lock().unwrap();
        assert!(
            diagnostics.is_empty(),
            "activity errors should not be repeated as warnings: {}",
            String::from_utf8_lossy(&diagnostics)
        );
    }

    #[test]
    fn test_run_missing_source_stays_quiet_at_default_filter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let captured = CapturedLogs::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        let (_, logs, _) = tracing::subscriber::with_default(subscriber, || {
            run_collecting(&Organizer::new(
                temp_dir.path().join("nope"),
                temp_dir.path().join("dst"),
            ))
        });

        assert_eq!(logs.len(), 1);
        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_run_destination_creation_failure_is_fatal() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();

        let result = Organizer::new(&src, blocker.join("dst")).run(|_| {}, |_| {});

        assert!(matches!(
            result,
            Err(OrganizeError::DestinationCreationFailed { .. })
        ));
        assert!(src.join("a.jpg").exists());
    }

    #[test]
    fn test_run_precancelled_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.jpg"), "a").unwrap();

        let flag = CancelFlag::new();
        flag.cancel();
        let (stats, logs, progress) =
            run_collecting(&Organizer::new(&src, &dst).with_cancel_flag(flag));

        assert!(stats.cancelled);
        assert_eq!(stats.processed(), 0);
        assert!(progress.is_empty());
        assert!(logs.last().unwrap().contains("Cancelled after 0 of 1"));
        assert!(src.join("a.jpg").exists());
    }

    #[test]
    fn test_plan_touches_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.mp4"), "a").unwrap();

        let plan = Organizer::new(&src, &dst).plan().unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].category.name(), "Videos");
        assert!(src.join("a.mp4").exists());
        assert!(!dst.exists());
    }

    #[test]
    fn test_spawn_forwards_events_in_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.mp3"), "a").unwrap();
        fs::write(src.join("b.mp3"), "b").unwrap();

        let handle = spawn(Organizer::new(&src, &dst));
        let events: Vec<RunEvent> = handle.events().iter().collect();
        let stats = handle.join().unwrap();

        assert_eq!(stats.moved, 2);
        assert_eq!(
            events,
            vec![
                RunEvent::Log("Found 2 file(s) to organize...".to_string()),
                RunEvent::Log("✓ Moved: a.mp3 → 🎵 Audios".to_string()),
                RunEvent::Progress(50),
                RunEvent::Log("✓ Moved: b.mp3 → 🎵 Audios".to_string()),
                RunEvent::Progress(100),
            ]
        );
    }
}
