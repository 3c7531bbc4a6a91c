use anyhow::bail;
use clap::Parser;
use dirsort::cli::{OrganizeCommand, run_cli_with_reserved};
use dirsort::logging::{self, DEFAULT_LOG_FILE};
use std::path::PathBuf;

/// Sort the files of a directory into category subfolders by extension.
#[derive(Parser, Debug)]
#[command(name = "dirsort", version, about, long_about = None)]
struct Args {
    /// Directory whose top-level files should be sorted
    directory: PathBuf,

    /// Preview the moves and analytics without touching any file
    #[arg(long, conflicts_with = "undo")]
    dry_run: bool,

    /// Revert the last organization of DIRECTORY
    #[arg(long)]
    undo: bool,

    /// Print the analytics snapshot as JSON
    #[arg(long, conflicts_with = "undo")]
    json: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Audit log file, appended to on every run
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Echo debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init(&args.log_file, args.verbose)?;

    if !args.directory.is_dir() {
        bail!(
            "Please select a valid directory: {}",
            args.directory.display()
        );
    }

    let command = if args.undo {
        OrganizeCommand::Undo
    } else {
        OrganizeCommand::Organize {
            dry_run: args.dry_run,
            json: args.json,
        }
    };

    let reserved = [args.log_file.clone()];
    if let Err(e) = run_cli_with_reserved(
        command,
        &args.directory,
        args.config.as_deref(),
        &reserved,
    ) {
        tracing::error!("{e}");
        bail!(e);
    }

    Ok(())
}
