//! Command-line front end for dirsort.
//!
//! This module plays the presentation role around the engine:
//! - Loading configuration and building the organizer
//! - Running organize and undo on a worker thread
//! - Rendering the event stream and the final analytics
//! - Keeping the undo history between invocations

use crate::config::OrganizerConfig;
use crate::engine::{OrganizeOutcome, Organizer};
use crate::events::OrganizerEvent;
use crate::file_organizer::ActionLog;
use crate::output::OutputFormatter;
use crate::undo::UndoOutcome;
use crate::worker::{self, RunHandle};
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, simulate the operation without making changes.
        dry_run: bool,
        /// If true, print the analytics as JSON instead of tables.
        json: bool,
    },
    /// Undo the previous organization.
    Undo,
}

/// Runs the CLI application with the given command and directory path.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let command = OrganizeCommand::Organize { dry_run: true, json: false };
/// match run_cli(command, Path::new("/path/to/directory")) {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs the CLI application with an optional configuration file.
///
/// # Arguments
///
/// * `command` - The command to execute (Organize or Undo)
/// * `dir_path` - The directory path to operate on
/// * `config_path` - Optional path to configuration file
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    run_cli_with_reserved(command, dir_path, config_path, &[])
}

/// Like [`run_cli_with_config`], but never organizes the files in `reserved`,
/// such as the audit log of the current run.
pub fn run_cli_with_reserved(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
    reserved: &[PathBuf],
) -> Result<(), String> {
    if !dir_path.is_dir() {
        return Err(format!(
            "Please select a valid directory: {}",
            dir_path.display()
        ));
    }

    match command {
        OrganizeCommand::Organize { dry_run, json } => {
            let config = OrganizerConfig::load(config_path)
                .map_err(|e| format!("Error loading configuration: {e}"))?;
            let organizer = Organizer::from_config(&config)
                .map_err(|e| format!("Error in configuration: {e}"))?
                .with_reserved_paths(reserved);
            organize_directory(Arc::new(organizer), dir_path, dry_run, json)
        }
        OrganizeCommand::Undo => undo_organization(dir_path),
    }
}

/// Organizes (or previews) `base_path` and prints the results.
///
/// After a real run the action log replaces the stored undo history, so only
/// the latest batch can be undone. A preview leaves the history untouched.
/// The history holds absolute paths, so undo works from any working directory.
pub fn organize_directory(
    organizer: Arc<Organizer>,
    base_path: &Path,
    dry_run: bool,
    json: bool,
) -> Result<(), String> {
    let resolved = fs::canonicalize(base_path)
        .map_err(|e| format!("Could not resolve {}: {e}", base_path.display()))?;
    let base_path = resolved.as_path();

    let handle = worker::spawn_organize(organizer, base_path.to_path_buf(), dry_run)
        .map_err(|e| format!("Could not start organizing: {e}"))?;

    let outcome = drain(handle, !json)?;
    let OrganizeOutcome {
        snapshot,
        processed_count,
        actions,
    } = outcome;

    if json {
        OutputFormatter::json(&snapshot)?;
    } else {
        OutputFormatter::summary_table(&snapshot);
        OutputFormatter::count_chart(&snapshot);
        OutputFormatter::size_distribution(&snapshot);
        println!();
    }

    if dry_run {
        if !json {
            OutputFormatter::dry_run_notice(&format!(
                "{processed_count} file(s) would be moved. No files were modified."
            ));
        }
        return Ok(());
    }

    if let Err(e) = actions.save(base_path) {
        OutputFormatter::warning(&format!("Could not save undo history: {e}"));
        return Ok(());
    }

    if !json {
        if actions.is_empty() {
            OutputFormatter::info("Nothing was moved.");
        } else {
            OutputFormatter::success(&format!(
                "Moved {processed_count} file(s). Use 'dirsort {} --undo' to revert.",
                base_path.display()
            ));
        }
    }

    Ok(())
}

/// Undoes the last recorded organization of `base_path`.
///
/// The history is removed once the pass has run, whether or not every file
/// could be restored.
pub fn undo_organization(base_path: &Path) -> Result<(), String> {
    let log = ActionLog::load(base_path).map_err(|e| format!("Error: {e}"))?;

    let Some(log) = log.filter(|log| !log.is_empty()) else {
        OutputFormatter::info("Nothing to undo.");
        return Ok(());
    };

    let handle = worker::spawn_undo(log).map_err(|e| format!("Could not start undo: {e}"))?;
    let (outcome, _cleared) = drain(handle, true)?;

    if let Err(e) = ActionLog::delete(base_path) {
        OutputFormatter::warning(&format!("Could not delete undo history: {e}"));
    }

    match outcome {
        UndoOutcome::NothingToUndo => OutputFormatter::info("Nothing to undo."),
        UndoOutcome::Completed(report) if report.is_complete_success() => {
            OutputFormatter::success(&format!("Restored {} file(s).", report.restored));
        }
        UndoOutcome::Completed(report) => {
            OutputFormatter::warning(&format!(
                "Restored {} of {} file(s), {} could not be restored:",
                report.restored,
                report.total_processed(),
                report.failed.len()
            ));
            for (path, reason) in &report.failed {
                OutputFormatter::error(&format!("{}: {reason}", path.display()));
            }
        }
    }

    Ok(())
}

/// Prints events until the worker finishes, then returns its result.
fn drain<T>(handle: RunHandle<T>, show: bool) -> Result<T, String> {
    let mut progress: Option<ProgressBar> = None;

    for event in handle.events.iter() {
        match event {
            OrganizerEvent::Log(line) if show => OutputFormatter::log_line(&line, progress.as_ref()),
            OrganizerEvent::Progress { handled, total } if show => {
                let pb = progress
                    .get_or_insert_with(|| OutputFormatter::create_progress_bar(total as u64));
                pb.set_position(handled as u64);
            }
            _ => {}
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    handle.join().map_err(|e| format!("Error: {e}"))
}
