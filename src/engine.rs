//! The organizer engine: scan, classify, move (or simulate), aggregate.

use crate::analytics::AnalyticsSnapshot;
use crate::config::{CONFIG_FILE_NAME, CompiledFilters, ConfigError, OrganizerConfig};
use crate::events::{EventSink, OrganizerEvent};
use crate::file_category::{CategoryRules, extension_of};
use crate::file_organizer::{ActionLog, FileOrganizer, HISTORY_FILE_NAME, OrganizeError};
use crate::logging::DEFAULT_LOG_FILE;
use std::fs;
use std::path::{Path, PathBuf};

/// File names the organizer never classifies or moves: its own audit log,
/// undo history and configuration file.
pub const RESERVED_FILENAMES: [&str; 3] = [DEFAULT_LOG_FILE, HISTORY_FILE_NAME, CONFIG_FILE_NAME];

/// A file seen during a scan, with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Lowercase extension including the dot, empty if none.
    pub extension: String,
    pub size: u64,
    pub category: String,
}

/// What an organize run produced.
#[derive(Debug, Clone)]
pub struct OrganizeOutcome {
    pub snapshot: AnalyticsSnapshot,
    /// Files moved, or that would have been moved in a dry run.
    pub processed_count: usize,
    /// Moves performed by this run. Always empty for a dry run.
    pub actions: ActionLog,
}

/// Classifies and moves the top-level files of a directory.
///
/// The organizer is immutable; all per-run state is returned in an
/// [`OrganizeOutcome`]. It holds no lock, so callers must not run two
/// operations on the same directory at once.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    rules: CategoryRules,
    filters: CompiledFilters,
    /// Canonical paths left alone in addition to [`RESERVED_FILENAMES`].
    reserved_paths: Vec<PathBuf>,
}

impl Organizer {
    pub fn new(rules: CategoryRules, filters: CompiledFilters) -> Self {
        Self {
            rules,
            filters,
            reserved_paths: Vec::new(),
        }
    }

    /// Never classifies or moves the given files, such as an audit log
    /// written into the directory being organized.
    ///
    /// Paths are canonicalized here, so they should exist already.
    pub fn with_reserved_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.reserved_paths.extend(paths.into_iter().map(|path| {
            let path = path.as_ref();
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }));
        self
    }

    /// Builds an organizer from a loaded configuration file.
    pub fn from_config(config: &OrganizerConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.category_rules()?, config.compile_filters()?))
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Scans `directory` and sorts its files into category subfolders.
    ///
    /// With `dry_run` set nothing on disk changes, but the snapshot is the
    /// same one a real run would produce. Per-file problems are reported on
    /// `events` and skipped; only a failure to list the directory ends the
    /// run early, with an empty snapshot.
    pub fn scan_and_organize(
        &self,
        directory: &Path,
        dry_run: bool,
        events: &EventSink,
    ) -> OrganizeOutcome {
        let prefix = if dry_run { "[DRY RUN] " } else { "" };
        events.info(format!(
            "{prefix}Starting organization process for: {}",
            directory.display()
        ));

        let mut outcome = OrganizeOutcome {
            snapshot: AnalyticsSnapshot::for_rules(&self.rules),
            processed_count: 0,
            actions: ActionLog::new(directory.to_path_buf()),
        };

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                let err = OrganizeError::UnreadableDirectory {
                    path: directory.to_path_buf(),
                    source: e,
                };
                events.error(format!("Error: {err}"));
                outcome.snapshot = AnalyticsSnapshot::default();
                Self::finish(events, dry_run, &outcome);
                return outcome;
            }
        };

        let entries: Vec<_> = entries.collect();
        let total = entries.len();

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Ok(entry) => self.handle_entry(&entry.path(), directory, dry_run, events, &mut outcome),
                Err(e) => events.warning(format!("Warning: Could not read a directory entry: {e}")),
            }
            events.send(OrganizerEvent::Progress {
                handled: index + 1,
                total,
            });
        }

        if outcome.processed_count == 0 {
            events.info("Info: No new files were found to organize.");
        }
        events.info(format!("{prefix}Organization complete!"));

        Self::finish(events, dry_run, &outcome);
        outcome
    }

    /// Classifies one directory entry, reading its size.
    ///
    /// Returns `None` for directories. Metadata errors propagate.
    pub fn inspect(&self, path: &Path) -> std::io::Result<Option<FileRecord>> {
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            return Ok(None);
        }

        Ok(Some(FileRecord {
            path: path.to_path_buf(),
            extension: extension_of(path),
            category: self.rules.classify_path(path).to_string(),
            size: metadata.len(),
        }))
    }

    fn handle_entry(
        &self,
        path: &Path,
        directory: &Path,
        dry_run: bool,
        events: &EventSink,
        outcome: &mut OrganizeOutcome,
    ) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.is_reserved(&name, path) {
            tracing::debug!("Ignoring reserved file '{name}'");
            return;
        }

        if !self.filters.should_include(path) {
            events.info(format!("Skipping: '{name}' (excluded by filters)."));
            return;
        }

        let record = match self.inspect(path) {
            Ok(Some(record)) => record,
            Ok(None) => {
                events.info(format!("Skipping: '{name}' (is a directory)."));
                return;
            }
            Err(e) => {
                events.warning(format!("Warning: Could not analyze '{name}': {e}"));
                return;
            }
        };

        outcome.snapshot.record(&record.category, record.size);

        if dry_run {
            events.info(format!(
                "[DRY RUN] Would move: '{name}' -> '{}'",
                record.category
            ));
            outcome.processed_count += 1;
            return;
        }

        let category_dir = directory.join(&record.category);
        let existed = category_dir.is_dir();
        let result = FileOrganizer::move_into_category(directory, &record.path, &record.category);
        if !existed && category_dir.is_dir() {
            outcome.actions.record_created_dir(category_dir);
        }

        match result {
            Ok(action) => {
                events.info(format!("Moved: '{name}' -> '{}'", record.category));
                outcome.actions.push(action);
                outcome.processed_count += 1;
            }
            Err(e) if e.is_collision() => events.warning(format!(
                "Warning: Could not move '{name}'. It may already exist. Details: {e}"
            )),
            Err(e) => events.error(format!("Error moving '{name}': {e}")),
        }
    }

    fn is_reserved(&self, name: &str, path: &Path) -> bool {
        if RESERVED_FILENAMES.contains(&name) {
            return true;
        }
        !self.reserved_paths.is_empty()
            && fs::canonicalize(path).is_ok_and(|p| self.reserved_paths.contains(&p))
    }

    fn finish(events: &EventSink, dry_run: bool, outcome: &OrganizeOutcome) {
        events.send(OrganizerEvent::Dashboard(outcome.snapshot.clone()));
        events.send(OrganizerEvent::Finished {
            dry_run,
            moved_any: !outcome.actions.is_empty(),
        });
    }
}
