//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and the per-category summary table.

use crate::ledger::CategoryLedger;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for sorting
/// - The per-category summary table
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a table of distinct names and extensions per category.
    ///
    /// Categories with nothing recorded are left out.
    ///
    /// # Arguments
    ///
    /// * `ledger` - The names and extensions recorded during the run
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::CategoryLedger;
    /// use dirsort::output::OutputFormatter;
    /// use dirsort::file_category::Category;
    ///
    /// let mut ledger = CategoryLedger::new();
    /// ledger.record(Category::Audio, "song.mp3", ".mp3");
    /// OutputFormatter::summary_table(&ledger);
    /// ```
    pub fn summary_table(ledger: &CategoryLedger) {
        Self::header("SUMMARY");

        let rows: Vec<_> = ledger.iter().filter(|r| !r.is_empty()).collect();
        let width = rows
            .iter()
            .map(|r| r.category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {:<5} | {}",
            "Category".bold(),
            "Files".bold(),
            "Extensions".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 30));

        for record in &rows {
            println!(
                "{:<width$} | {:<5} | {}",
                record.category.dir_name(),
                record.names.len().to_string().green(),
                record.extensions.join(" "),
                width = width
            );
        }

        let total = ledger.total_names();
        println!("{}", "-".repeat(width + 30));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            if total == 1 { "file" } else { "files" },
            width = width
        );
    }
}
