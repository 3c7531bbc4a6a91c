/// Single-file moves into category directories and the record of those moves.
///
/// This module provides the move primitive used by the engine and the undo
/// replayer, the [`ActionLog`] that makes a batch of moves reversible, and
/// JSON persistence of that log so undo works across CLI invocations.
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the undo history file written into the organized directory.
pub const HISTORY_FILE_NAME: &str = ".dirsort_history.json";

/// One completed move, recorded so it can be reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    /// Where the file lives after the move.
    pub destination: PathBuf,
    /// Where the file was before the move.
    pub source: PathBuf,
}

/// The ordered record of one batch of moves.
///
/// Created empty at the start of every real organize run and consumed by undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    /// RFC 3339 timestamp of when the batch started.
    pub timestamp: String,
    /// The directory that was organized.
    pub base_path: PathBuf,
    /// Moves in the order they happened.
    pub actions: Vec<MoveAction>,
    /// Category folders this batch created, in creation order. Undo removes
    /// the ones that are empty again.
    #[serde(default)]
    pub created_dirs: Vec<PathBuf>,
}

impl ActionLog {
    /// Creates a new, empty log for a given base path.
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            base_path,
            actions: Vec::new(),
            created_dirs: Vec::new(),
        }
    }

    pub fn push(&mut self, action: MoveAction) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn record_created_dir(&mut self, dir: PathBuf) {
        if !self.created_dirs.contains(&dir) {
            self.created_dirs.push(dir);
        }
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.created_dirs.clear();
    }

    /// Returns the path to the history file for this base path.
    pub fn history_file_path(base_path: &Path) -> PathBuf {
        base_path.join(HISTORY_FILE_NAME)
    }

    /// Saves this log to `base_path` in JSON format, replacing any earlier log.
    pub fn save(&self, base_path: &Path) -> OrganizeResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            OrganizeError::HistoryWriteFailed {
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            }
        })?;

        fs::write(Self::history_file_path(base_path), json)
            .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })
    }

    /// Loads the saved log for `base_path`, if there is one.
    pub fn load(base_path: &Path) -> OrganizeResult<Option<Self>> {
        let history_path = Self::history_file_path(base_path);

        if !history_path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&history_path)
            .map_err(|e| OrganizeError::HistoryReadFailed { source: e })?;

        let log = serde_json::from_str(&json).map_err(|e| OrganizeError::InvalidHistoryFormat {
            reason: e.to_string(),
        })?;

        Ok(Some(log))
    }

    /// Deletes the history file for a given base path.
    pub fn delete(base_path: &Path) -> OrganizeResult<()> {
        let history_path = Self::history_file_path(base_path);
        if history_path.exists() {
            fs::remove_file(&history_path)
                .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        }
        Ok(())
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The directory to organize could not be listed.
    #[error("Could not read directory {}: {source}", path.display())]
    UnreadableDirectory { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Something already occupies the target path; nothing was moved.
    #[error("{} already exists", destination.display())]
    DestinationExists { destination: PathBuf },
    /// Failed to move a file.
    #[error("Failed to move {} to {}: {error}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: io::Error,
    },
    /// Failed to write history file.
    #[error("Failed to write history file: {source}")]
    HistoryWriteFailed { source: io::Error },
    /// Failed to read history file.
    #[error("Failed to read history file: {source}")]
    HistoryReadFailed { source: io::Error },
    /// History file has invalid format.
    #[error("Invalid history file format: {reason}")]
    InvalidHistoryFormat { reason: String },
}

impl OrganizeError {
    /// True for a naming collision, which is reported as a warning rather
    /// than an error.
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::DestinationExists { .. })
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files between the organized directory and its category folders.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves a file into its category directory within the base path and records the move.
    ///
    /// The category directory is created when missing; an existing one is
    /// reused as is. An existing file at the destination is never overwritten.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let result = FileOrganizer::move_into_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     "Images",
    /// );
    ///
    /// match result {
    ///     Ok(action) => println!("Moved to {}", action.destination.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_into_category(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> OrganizeResult<MoveAction> {
        let category_path = base_path.join(category);

        if !category_path.is_dir() {
            fs::create_dir_all(&category_path).map_err(|e| {
                OrganizeError::DirectoryCreationFailed {
                    path: category_path.clone(),
                    source: e,
                }
            })?;
        }

        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                from: file_path.to_path_buf(),
                to: category_path.clone(),
                error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination = category_path.join(file_name);
        Self::move_file(file_path, &destination)?;

        Ok(MoveAction {
            destination,
            source: file_path.to_path_buf(),
        })
    }

    /// Moves a file back to where a [`MoveAction`] took it from.
    ///
    /// The parent of the original location is recreated if it disappeared.
    pub fn move_back(action: &MoveAction) -> OrganizeResult<()> {
        if let Some(parent) = action.source.parent()
            && !parent.as_os_str().is_empty()
            && !parent.is_dir()
        {
            fs::create_dir_all(parent).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Self::move_file(&action.destination, &action.source)
    }

    /// Renames `from` to `to`, refusing to replace anything already at `to`.
    fn move_file(from: &Path, to: &Path) -> OrganizeResult<()> {
        // symlink_metadata so that a dangling link at the target also counts
        if fs::symlink_metadata(to).is_ok() {
            return Err(OrganizeError::DestinationExists {
                destination: to.to_path_buf(),
            });
        }

        fs::rename(from, to).map_err(|e| OrganizeError::FileMoveFailure {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_into_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let action = FileOrganizer::move_into_category(base_path, &file_path, "Documents")
            .expect("Failed to move file");

        let category_dir = base_path.join("Documents");
        assert!(category_dir.is_dir());
        assert!(!file_path.exists());
        assert_eq!(action.destination, category_dir.join("test.txt"));
        assert_eq!(action.source, file_path);
        assert_eq!(
            fs::read_to_string(&action.destination).unwrap(),
            "test content"
        );
    }

    #[test]
    fn test_move_into_category_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let category_dir = base_path.join("Images");
        fs::create_dir(&category_dir).expect("Failed to create category directory");
        fs::write(category_dir.join("old.png"), "old").unwrap();

        let file_path = base_path.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        FileOrganizer::move_into_category(base_path, &file_path, "Images")
            .expect("Failed to move file");

        assert!(!file_path.exists());
        assert!(category_dir.join("test.png").exists());
        assert_eq!(fs::read_to_string(category_dir.join("old.png")).unwrap(), "old");
    }

    #[test]
    fn test_move_into_category_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::create_dir(base_path.join("Documents")).unwrap();
        fs::write(base_path.join("Documents").join("a.txt"), "existing").unwrap();
        let file_path = base_path.join("a.txt");
        fs::write(&file_path, "incoming").unwrap();

        let err = FileOrganizer::move_into_category(base_path, &file_path, "Documents")
            .expect_err("collision must fail");

        assert!(err.is_collision());
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "incoming");
        assert_eq!(
            fs::read_to_string(base_path.join("Documents").join("a.txt")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_move_into_category_when_category_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        fs::write(base_path.join("Images"), "not a directory").unwrap();
        let file_path = base_path.join("photo.png");
        fs::write(&file_path, "png").unwrap();

        let err = FileOrganizer::move_into_category(base_path, &file_path, "Images")
            .expect_err("cannot create a folder over a file");
        assert!(!err.is_collision());
        assert!(file_path.exists());
    }

    #[test]
    fn test_move_missing_file_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let result =
            FileOrganizer::move_into_category(base_path, &base_path.join("ghost.txt"), "Documents");
        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
    }

    #[test]
    fn test_move_back_recreates_parent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let destination = base_path.join("moved.txt");
        fs::write(&destination, "data").unwrap();
        let action = MoveAction {
            destination: destination.clone(),
            source: base_path.join("gone").join("moved.txt"),
        };

        FileOrganizer::move_back(&action).expect("move back");
        assert!(!destination.exists());
        assert_eq!(fs::read_to_string(&action.source).unwrap(), "data");
    }

    #[test]
    fn test_action_log_save_load_delete() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        assert!(ActionLog::load(base_path).unwrap().is_none());

        let mut log = ActionLog::new(base_path.to_path_buf());
        log.push(MoveAction {
            destination: base_path.join("Images").join("a.png"),
            source: base_path.join("a.png"),
        });
        log.record_created_dir(base_path.join("Images"));
        log.record_created_dir(base_path.join("Images"));
        log.save(base_path).expect("save");

        let loaded = ActionLog::load(base_path).unwrap().expect("saved log");
        assert_eq!(loaded, log);
        assert_eq!(loaded.created_dirs.len(), 1);

        ActionLog::delete(base_path).expect("delete");
        assert!(!ActionLog::history_file_path(base_path).exists());
        ActionLog::delete(base_path).expect("deleting twice is fine");
    }

    #[test]
    fn test_action_log_without_created_dirs_loads() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(
            ActionLog::history_file_path(base_path),
            r#"{"timestamp": "2024-01-01T00:00:00+00:00", "base_path": "/tmp", "actions": []}"#,
        )
        .unwrap();

        let loaded = ActionLog::load(base_path).unwrap().expect("saved log");
        assert!(loaded.is_empty());
        assert!(loaded.created_dirs.is_empty());
    }

    #[test]
    fn test_action_log_load_corrupt() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(ActionLog::history_file_path(base_path), "{ not json").unwrap();

        let result = ActionLog::load(base_path);
        assert!(matches!(
            result,
            Err(OrganizeError::InvalidHistoryFormat { .. })
        ));
    }
}
