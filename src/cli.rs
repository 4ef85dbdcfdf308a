//! Command-line interface module for sortdir.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - The precondition checks a caller owes the engine (paths present, distinct)
//! - Running the organize pass on a worker thread and rendering its events
//! - Dry runs and the category listing

use crate::config::{Config, ConfigError};
use crate::file_category::CategoryTable;
use crate::file_organizer::OrganizeError;
use crate::logging;
use crate::organizer::{self, Organizer, RunEvent};
use crate::output::OutputFormatter;
use clap::{ArgAction, Parser, ValueHint};
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::warn;

/// Sort files into category folders.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Sort files from a folder tree into category folders by extension"
)]
pub struct Args {
    /// Folder to take files from (falls back to paths.source in the config file).
    #[arg(value_name = "SOURCE", value_hint = ValueHint::DirPath)]
    pub source: Option<PathBuf>,

    /// Folder to create category folders in (falls back to paths.destination).
    #[arg(value_name = "DESTINATION", value_hint = ValueHint::DirPath)]
    pub destination: Option<PathBuf>,

    /// Configuration file to use instead of the default search.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Show where files would go, but do not move anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Diagnostic log filter, e.g. `debug` or `sortdir=trace`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not draw a progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Print the built-in category table and exit.
    #[arg(long)]
    pub list_categories: bool,
}

/// Errors reported by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No {0} folder given; pass it as an argument or set paths.{0} in the config file")]
    MissingPath(&'static str),
    #[error("The {0} folder path is empty")]
    EmptyPath(&'static str),
    #[error("Source and destination cannot be the same folder: {}", .0.display())]
    SamePaths(PathBuf),
    #[error(
        "Destination {} is inside source {}; sorted files would be picked up again",
        .destination_dir.display(),
        .source_dir.display()
    )]
    DestinationInsideSource {
        source_dir: PathBuf,
        destination_dir: PathBuf,
    },
    #[error("Error loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Runs the CLI application with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use sortdir::cli::{run_cli, Args};
/// use std::path::PathBuf;
///
/// let args = Args {
///     source: Some(PathBuf::from("/path/to/inbox")),
///     destination: Some(PathBuf::from("/path/to/sorted")),
///     no_progress: true,
///     ..Default::default()
/// };
/// if let Err(e) = run_cli(args) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(args: Args) -> Result<(), CliError> {
    if args.list_categories {
        OutputFormatter::category_listing(CategoryTable::standard());
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    logging::init(&logging::effective_filter(
        args.log_level.as_deref(),
        args.verbose,
        &config.logging.level,
    ));

    let (source, destination) = validate_paths(
        args.source.or(config.paths.source),
        args.destination.or(config.paths.destination),
    )?;

    if args.dry_run {
        return dry_run(&source, &destination);
    }

    let show_progress = config.output.progress_bar && !args.no_progress;
    organize_with_progress(&source, &destination, show_progress)
}

/// Checks the paths before any run: both present, non-empty, distinct, and the
/// destination not nested inside the source.
///
/// Returns absolute versions of both paths.
pub fn validate_paths(
    source: Option<PathBuf>,
    destination: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf), CliError> {
    let source = source.ok_or(CliError::MissingPath("source"))?;
    let destination = destination.ok_or(CliError::MissingPath("destination"))?;

    if is_blank(&source) {
        return Err(CliError::EmptyPath("source"));
    }
    if is_blank(&destination) {
        return Err(CliError::EmptyPath("destination"));
    }

    let source = resolve(&source);
    let destination = resolve(&destination);

    if source == destination {
        return Err(CliError::SamePaths(source));
    }
    if destination.starts_with(&source) {
        return Err(CliError::DestinationInsideSource {
            source_dir: source,
            destination_dir: destination,
        });
    }

    Ok((source, destination))
}

fn is_blank(path: &Path) -> bool {
    path.to_string_lossy().trim().is_empty()
}

/// Resolves `path` for comparison: `.` and `..` are folded away, then the
/// deepest existing ancestor is canonicalized and the missing tail re-appended.
fn resolve(path: &Path) -> PathBuf {
    let absolute =
        normalize_lexically(&std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()));

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }

    absolute
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Runs the organize pass on a worker thread while this thread renders events.
fn organize_with_progress(
    source: &Path,
    destination: &Path,
    show_progress: bool,
) -> Result<(), CliError> {
    let organizer = Organizer::new(source, destination);

    let cancel = organizer.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(error = %e, "could not install Ctrl-C handler");
    }

    OutputFormatter::run_banner(
        &source.display().to_string(),
        &destination.display().to_string(),
    );

    let started = Instant::now();
    let handle = organizer::spawn(organizer);
    let bar = show_progress.then(OutputFormatter::create_progress_bar);

    for event in handle.events().iter() {
        match event {
            RunEvent::Log(line) => match &bar {
                Some(pb) => pb.suspend(|| OutputFormatter::activity(&line)),
                None => OutputFormatter::activity(&line),
            },
            RunEvent::Progress(percent) => {
                if let Some(pb) = &bar {
                    pb.set_position(u64::from(percent));
                }
            }
        }
    }
    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let stats = handle.join()?;
    OutputFormatter::run_summary(&stats, started.elapsed());
    if stats.cancelled {
        OutputFormatter::warning("Run was interrupted; remaining files were left in place.");
    }

    Ok(())
}

/// Shows what would be organized without making any changes.
fn dry_run(source: &Path, destination: &Path) -> Result<(), CliError> {
    OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", source.display()));

    if !source.is_dir() {
        OutputFormatter::error(&format!(
            "Source folder does not exist: {}",
            source.display()
        ));
        return Ok(());
    }

    let planned = Organizer::new(source, destination).plan()?;
    if planned.is_empty() {
        OutputFormatter::warning("No files found to organize.");
        return Ok(());
    }

    OutputFormatter::header(&format!(
        "Files would be organized into {}:",
        destination.display()
    ));
    OutputFormatter::plan(&planned);
    OutputFormatter::success("Dry run complete. No files were modified.");

    Ok(())
}
