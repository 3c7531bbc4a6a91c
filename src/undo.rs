/// Undo of the last organize run.
///
/// Replays an [`ActionLog`] backwards, moving every file from its category
/// folder back to where it came from. Undo is best effort: a file that cannot
/// be restored is reported and the pass carries on.
use crate::events::{EventSink, OrganizerEvent};
use crate::file_organizer::{ActionLog, FileOrganizer};
use std::fs;
use std::path::PathBuf;

/// Represents the result of an undo pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// Number of files successfully restored.
    pub restored: usize,
    /// Files that could not be restored, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Returns the total number of actions processed.
    pub fn total_processed(&self) -> usize {
        self.restored + self.failed.len()
    }

    /// Returns true if every file was restored.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of [`undo`].
#[derive(Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The log was empty; nothing on disk was touched.
    NothingToUndo,
    Completed(UndoReport),
}

/// Reverses the moves in `actions`, most recent first, then clears the log.
///
/// Category folders the batch created are removed once they are empty again;
/// a folder that still holds files is kept.
///
/// The log is cleared even when some files fail: it describes one batch of
/// moves and a partly reverted batch cannot be replayed again.
///
/// # Examples
///
/// ```no_run
/// use dirsort::events::EventSink;
/// use dirsort::file_organizer::ActionLog;
/// use dirsort::undo::{undo, UndoOutcome};
/// use std::path::Path;
///
/// let mut log = ActionLog::load(Path::new("/path/to/directory"))
///     .ok()
///     .flatten()
///     .unwrap_or_else(|| ActionLog::new("/path/to/directory".into()));
/// match undo(&mut log, &EventSink::discard()) {
///     UndoOutcome::NothingToUndo => println!("Nothing to undo"),
///     UndoOutcome::Completed(report) => println!("Restored {} files", report.restored),
/// }
/// ```
pub fn undo(actions: &mut ActionLog, events: &EventSink) -> UndoOutcome {
    if actions.is_empty() {
        events.info("Nothing to undo.");
        return UndoOutcome::NothingToUndo;
    }

    events.info("Starting undo process...");

    let mut report = UndoReport::default();
    for action in actions.actions.iter().rev() {
        let name = action
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match FileOrganizer::move_back(action) {
            Ok(()) => {
                events.info(format!("Reverted: '{name}'"));
                report.restored += 1;
            }
            Err(e) => {
                events.error(format!("Error undoing '{name}': {e}"));
                report.failed.push((action.destination.clone(), e.to_string()));
            }
        }
    }

    for dir in actions.created_dirs.iter().rev() {
        match fs::remove_dir(dir) {
            Ok(()) => tracing::debug!("Removed empty folder {}", dir.display()),
            Err(e) => tracing::debug!("Keeping folder {}: {e}", dir.display()),
        }
    }

    actions.clear();

    events.info("Undo complete!");
    events.send(OrganizerEvent::UndoFinished {
        restored: report.restored,
        failed: report.failed.len(),
    });

    UndoOutcome::Completed(report)
}
