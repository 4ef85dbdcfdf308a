//! sortdir - sort a folder tree into category folders
//!
//! This library classifies files by extension against a fixed category table,
//! walks a source tree while skipping hidden entries, moves every file into the
//! matching category folder of a destination directory without overwriting
//! anything, reports progress and an activity log through callbacks, and finally
//! prunes the source directories it emptied.

pub mod cleanup;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod organizer;
pub mod output;
pub mod walker;

pub use config::{Config, ConfigError};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileMover, MoveOutcome, OrganizeError};
pub use organizer::{CancelFlag, Organizer, RunEvent, RunStats, organize};

pub use cli::{Args, run_cli};
