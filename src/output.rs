//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. The organizing engine never prints;
//! everything the user sees goes through here.

use crate::file_category::CategoryTable;
use crate::organizer::{PlannedMove, RunStats};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

/// Width of the horizontal rules around the activity log.
const RULE_WIDTH: usize = 50;

/// How an activity line from the engine should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Success,
    Error,
    Warning,
    Plain,
}

impl LineKind {
    /// Infers the kind from the marker the engine puts at the start of a line.
    pub fn of(line: &str) -> Self {
        if line.starts_with('✓') {
            LineKind::Success
        } else if line.starts_with('✗') {
            LineKind::Error
        } else if line.starts_with('⚠') {
            LineKind::Warning
        } else {
            LineKind::Plain
        }
    }
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Progress bars for operations
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a horizontal rule.
    pub fn rule() {
        println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    }

    /// Styles one activity line emitted by the engine.
    ///
    /// The engine already prefixes lines with their marker, so only color is
    /// added here.
    pub fn styled_activity(line: &str) -> ColoredString {
        match LineKind::of(line) {
            LineKind::Success => line.green(),
            LineKind::Error => line.red(),
            LineKind::Warning => line.yellow(),
            LineKind::Plain => line.normal(),
        }
    }

    /// Prints one activity line; errors go to stderr.
    pub fn activity(line: &str) {
        if LineKind::of(line) == LineKind::Error {
            eprintln!("{}", Self::styled_activity(line));
        } else {
            println!("{}", Self::styled_activity(line));
        }
    }

    /// Prints the banner shown before a run.
    pub fn run_banner(source: &str, destination: &str) {
        println!("{}", "Starting organization...".bold());
        println!("{} {}", "Source:".cyan(), source);
        println!("{} {}", "Dest:  ".cyan(), destination);
        Self::rule();
    }

    /// Creates a percentage progress bar (0..=100).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdir::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar();
    /// pb.set_position(40);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Formats the completion line, e.g. `Done in 0.42s | Moved: 3 | Failed: 0`.
    pub fn completion_line(stats: &RunStats, elapsed: Duration) -> String {
        format!(
            "Done in {:.2}s  |  Moved: {}  |  Failed: {}",
            elapsed.as_secs_f64(),
            stats.moved,
            stats.failed
        )
    }

    /// Prints the completion line and the per-category summary of a run.
    pub fn run_summary(stats: &RunStats, elapsed: Duration) {
        Self::rule();
        let line = Self::completion_line(stats, elapsed);
        if stats.failed == 0 && !stats.cancelled {
            Self::success(&line);
        } else {
            Self::warning(&line);
        }

        if !stats.categories.is_empty() {
            Self::summary_table(&stats.sorted_categories(), stats.moved);
        }
    }

    /// Prints a summary table with file counts by category, in the given order.
    pub fn summary_table(rows: &[(&str, usize)], total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = max_category_len
        );
    }

    /// Prints what a dry run would do, followed by a summary table.
    pub fn plan(planned: &[PlannedMove]) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in planned {
            let name = item
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            println!(" - {}", name);
            println!("   → Would move to {}/", item.category.name());
            *counts.entry(item.category.name()).or_insert(0) += 1;
        }

        let mut rows: Vec<(&str, usize)> = counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        Self::summary_table(&rows, planned.len());
    }

    /// Prints the built-in category table.
    pub fn category_listing(table: &CategoryTable) {
        Self::header("FILE CATEGORIES");
        for category in table.iter() {
            let extensions = if category.is_catch_all() {
                "(everything else)".dimmed().to_string()
            } else {
                category.extensions().join(" ")
            };
            println!("{:<16} {}", category.display_label().bold(), extensions);
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
