//! dirsort - sort a directory's files into category subfolders
//!
//! This library classifies the top-level files of a directory by extension,
//! moves them into one subfolder per category (or previews the moves),
//! aggregates count and size analytics, and reverses the last batch of moves
//! on request. Progress is reported through an event channel so any front end
//! can drive the engine from a background thread.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod engine;
pub mod events;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod undo;
pub mod worker;

pub use analytics::{AnalyticsSnapshot, CategoryStats};
pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use engine::{OrganizeOutcome, Organizer, RESERVED_FILENAMES};
pub use events::{EventSink, OrganizerEvent, Severity};
pub use file_category::{CategoryRule, CategoryRules, FALLBACK_CATEGORY};
pub use file_organizer::{ActionLog, FileOrganizer, MoveAction};
pub use undo::{UndoOutcome, UndoReport, undo};

pub use cli::{OrganizeCommand, run_cli};
