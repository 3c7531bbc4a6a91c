//! Background execution of organize and undo runs.
//!
//! Each run gets its own thread and its own event channel. The front end
//! drains [`RunHandle::events`] while the run is in flight and then calls
//! [`RunHandle::join`] for the result. The receiver disconnects once the run
//! has finished and dropped its sink, so iterating it to the end is a valid
//! way to wait.

use crate::engine::{OrganizeOutcome, Organizer};
use crate::events::{EventSink, OrganizerEvent};
use crate::file_organizer::ActionLog;
use crate::undo::{UndoOutcome, undo};
use crossbeam_channel::Receiver;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Handle to a running or finished operation.
pub struct RunHandle<T> {
    /// Notifications from the worker thread.
    pub events: Receiver<OrganizerEvent>,
    thread: JoinHandle<T>,
}

impl<T> RunHandle<T> {
    /// Waits for the worker and returns its result.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread panicked.
    pub fn join(self) -> io::Result<T> {
        self.thread
            .join()
            .map_err(|_| io::Error::other("worker thread panicked"))
    }
}

/// Runs [`Organizer::scan_and_organize`] on a background thread.
///
/// # Errors
///
/// Fails only if the thread cannot be spawned.
pub fn spawn_organize(
    organizer: Arc<Organizer>,
    directory: PathBuf,
    dry_run: bool,
) -> io::Result<RunHandle<OrganizeOutcome>> {
    let (sink, events) = EventSink::channel();
    let thread = thread::Builder::new()
        .name("dirsort-organize".into())
        .spawn(move || organizer.scan_and_organize(&directory, dry_run, &sink))?;

    Ok(RunHandle { events, thread })
}

/// Runs [`undo`] on a background thread.
///
/// The log is moved into the worker; the cleared log is handed back together
/// with the outcome.
///
/// # Errors
///
/// Fails only if the thread cannot be spawned.
pub fn spawn_undo(mut actions: ActionLog) -> io::Result<RunHandle<(UndoOutcome, ActionLog)>> {
    let (sink, events) = EventSink::channel();
    let thread = thread::Builder::new()
        .name("dirsort-undo".into())
        .spawn(move || {
            let outcome = undo(&mut actions, &sink);
            (outcome, actions)
        })?;

    Ok(RunHandle { events, thread })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_organize_then_undo_in_background() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("song.mp3"), "mp3").unwrap();

        let handle = spawn_organize(
            Arc::new(Organizer::default()),
            temp_dir.path().to_path_buf(),
            false,
        )
        .unwrap();
        let events: Vec<_> = handle.events.iter().collect();
        let outcome = handle.join().unwrap();

        assert!(matches!(
            events.last(),
            Some(OrganizerEvent::Finished {
                dry_run: false,
                moved_any: true
            })
        ));
        assert_eq!(outcome.processed_count, 1);
        assert!(temp_dir.path().join("Audio").join("song.mp3").is_file());

        let handle = spawn_undo(outcome.actions).unwrap();
        let events: Vec<_> = handle.events.iter().collect();
        let (undo_outcome, log) = handle.join().unwrap();

        assert!(matches!(undo_outcome, UndoOutcome::Completed(ref r) if r.restored == 1));
        assert!(log.is_empty());
        assert!(events.iter().any(|e| matches!(
            e,
            OrganizerEvent::UndoFinished {
                restored: 1,
                failed: 0
            }
        )));
        assert!(temp_dir.path().join("song.mp3").is_file());
    }
}
