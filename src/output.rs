//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: severity-styled log
//! lines, the progress bar, and the analytics summary (category table and size
//! distribution chart).

use crate::analytics::{AnalyticsSnapshot, HistogramBin, format_size};
use crate::events::{LogLine, Severity};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Number of buckets in the size distribution chart.
pub const HISTOGRAM_BINS: usize = 10;

const BAR_WIDTH: usize = 30;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
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

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Formats one activity log line the way [`Self::log_line`] prints it.
    pub fn format_log_line(line: &LogLine) -> String {
        match line.severity {
            Severity::Info => line.message.clone(),
            Severity::Warning => format!("{} {}", "⚠".yellow(), line.message.yellow()),
            Severity::Error => format!("{} {}", "✗".red(), line.message.red()),
        }
    }

    /// Prints one activity log line, above the progress bar if one is shown.
    pub fn log_line(line: &LogLine, progress: Option<&ProgressBar>) {
        let text = Self::format_log_line(line);
        let print = || {
            if line.severity == Severity::Error {
                eprintln!("{text}");
            } else {
                println!("{text}");
            }
        };
        match progress {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    /// Creates a progress bar for a run over `total` directory entries.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints the per-category table: files, total size and share of size.
    ///
    /// Only categories that received files are listed.
    pub fn summary_table(snapshot: &AnalyticsSnapshot) {
        Self::header("SUMMARY");

        if snapshot.total_files() == 0 {
            println!("No files were processed.");
            return;
        }

        let width = snapshot
            .non_empty()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {:>6} | {:>12} | {:>6}",
            "Category".bold(),
            "Files".bold(),
            "Size".bold(),
            "Share".bold(),
        );
        println!("{}", "-".repeat(width + 36));

        for stats in snapshot.non_empty() {
            println!(
                "{:<width$} | {:>6} | {:>12} | {:>5.1}%",
                stats.name,
                stats.count.to_string().green(),
                format_size(stats.total_size),
                snapshot.share_of_size(&stats.name) * 100.0,
            );
        }

        println!("{}", "-".repeat(width + 36));
        println!(
            "{:<width$} | {:>6} | {:>12} |",
            "Total".bold(),
            snapshot.total_files().to_string().green().bold(),
            format_size(snapshot.total_size()),
        );
    }

    /// Prints the file count per category as a horizontal bar chart.
    pub fn count_chart(snapshot: &AnalyticsSnapshot) {
        let max = snapshot.non_empty().map(|c| c.count).max().unwrap_or(0);
        if max == 0 {
            return;
        }
        Self::header("FILE COUNT BY CATEGORY");
        let width = snapshot.non_empty().map(|c| c.name.len()).max().unwrap_or(0);
        for stats in snapshot.non_empty() {
            println!(
                "{:<width$} {} {}",
                stats.name,
                bar(stats.count, max).green(),
                stats.count
            );
        }
    }

    /// Prints the log-scaled size distribution chart.
    pub fn size_distribution(snapshot: &AnalyticsSnapshot) {
        let histogram = snapshot.size_histogram(HISTOGRAM_BINS);
        if histogram.is_empty() {
            return;
        }
        Self::header("FILE SIZE DISTRIBUTION");
        let max = histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for bin in &histogram {
            println!(
                "{:>23} {} {}",
                bin_label(bin),
                bar(bin.count, max).cyan(),
                bin.count
            );
        }
    }

    /// Prints the snapshot as pretty JSON.
    pub fn json(snapshot: &AnalyticsSnapshot) -> Result<(), String> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| format!("Could not serialize analytics: {e}"))?;
        println!("{json}");
        Ok(())
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {message}").yellow());
    }
}

fn bar(value: usize, max: usize) -> String {
    if max == 0 || value == 0 {
        return String::new();
    }
    let len = (value * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}

fn bin_label(bin: &HistogramBin) -> String {
    format!("{} - {}", format_size(bin.lower), format_size(bin.upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).chars().count(), BAR_WIDTH);
        assert_eq!(bar(1, 1000).chars().count(), 1);
        assert_eq!(bar(5, 10).chars().count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_bin_label() {
        let bin = HistogramBin {
            lower: 100,
            upper: 2048,
            count: 3,
        };
        assert_eq!(bin_label(&bin), "100 B - 2.00 KB");
    }

    #[test]
    fn test_format_log_line_keeps_message() {
        colored::control::set_override(false);
        let line = LogLine {
            severity: Severity::Warning,
            message: "Could not analyze 'x'".to_string(),
        };
        assert!(OutputFormatter::format_log_line(&line).contains("Could not analyze 'x'"));

        let info = LogLine {
            severity: Severity::Info,
            message: "Moved: 'a' -> 'Images'".to_string(),
        };
        assert_eq!(OutputFormatter::format_log_line(&info), info.message);
    }
}
