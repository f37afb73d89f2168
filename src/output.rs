//! Console output.
//!
//! Every line the sorter shows a user goes through [`OutputFormatter`], so the
//! wording and styling live in one place. Styling comes from `colored`, which
//! drops the escape codes when stdout is not a terminal or `NO_COLOR` is set.

use colored::*;
use std::fmt::Display;
use std::path::Path;

/// Formats progress, dry-run, error and summary lines.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdrop::output::OutputFormatter;
    /// OutputFormatter::success("Files have been organized successfully.");
    /// ```
    pub fn success(message: &str) {
        println!("{}", message.green());
    }

    /// Prints an error message in red on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    /// Prints a dry-run notice in yellow.
    pub fn dry_run_notice(message: &str) {
        println!("{}", message.yellow());
    }

    /// Describes a move that a dry run would have made.
    ///
    /// ```no_run
    /// use sortdrop::output::OutputFormatter;
    /// OutputFormatter::dry_run_move("report.pdf", "Documents");
    /// // Dry Run: 'report.pdf' will move to 'Documents' folder.
    /// ```
    pub fn dry_run_move(file_name: &str, category: &str) {
        Self::dry_run_notice(&format!(
            "Dry Run: '{}' will move to '{}' folder.",
            file_name, category
        ));
    }

    /// Reports a file that could not be moved. The batch carries on.
    pub fn file_error(path: &Path, reason: impl Display) {
        eprintln!(
            "{}",
            format!("Error moving file '{}': {}", path.display(), reason).red()
        );
    }

    /// Prints the running `<processed>/<total>` progress line.
    pub fn progress(processed: usize, total: usize) {
        println!(
            "{} {}/{} files processed.",
            "Progress:".cyan(),
            processed,
            total
        );
    }

    /// Prints the closing line of a run.
    pub fn summary(dry_run: bool) {
        if dry_run {
            Self::dry_run_notice("Dry run completed. No files were moved.");
        } else {
            Self::success("Files have been organized successfully.");
        }
    }
}
