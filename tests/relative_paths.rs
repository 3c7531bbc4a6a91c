//! Organize and undo through relative directory paths.
//!
//! These tests change the process working directory, so they live in their
//! own test binary and run as a single test.

use dirsort::cli::{OrganizeCommand, run_cli_with_config};
use dirsort::file_organizer::ActionLog;
use std::env;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_undo_from_another_working_directory() {
    let root = TempDir::new().expect("Failed to create temp directory");
    let parent = root.path();
    let photos = parent.join("a").join("photos");
    fs::create_dir_all(&photos).expect("Failed to create directories");
    fs::write(photos.join("pic.png"), "png").expect("Failed to write file");
    let original_cwd = env::current_dir().expect("Failed to read working directory");

    env::set_current_dir(parent.join("a")).expect("Failed to change directory");
    let organized = run_cli_with_config(
        OrganizeCommand::Organize {
            dry_run: false,
            json: false,
        },
        Path::new("photos"),
        None,
    );
    let history = ActionLog::load(Path::new("photos"));

    env::set_current_dir(parent).expect("Failed to change directory");
    let undone = run_cli_with_config(OrganizeCommand::Undo, Path::new("a/photos"), None);

    env::set_current_dir(original_cwd).expect("Failed to restore working directory");

    assert!(organized.is_ok(), "{organized:?}");
    let history = history
        .expect("Failed to read history")
        .expect("history was saved");
    assert!(history.base_path.is_absolute());
    assert!(
        history
            .actions
            .iter()
            .all(|a| a.source.is_absolute() && a.destination.is_absolute())
    );

    assert!(undone.is_ok(), "{undone:?}");
    assert!(photos.join("pic.png").is_file());
    assert!(!photos.join("Images").exists());
    assert!(!ActionLog::history_file_path(&photos).exists());
}
