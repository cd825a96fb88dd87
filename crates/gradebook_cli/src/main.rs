//! Gradebook command-line entry point.
//!
//! # Responsibility
//! - Parse runtime configuration (database path, logging) from args/env.
//! - Wire the SQLite backend, terminal view and notifier into the roster
//!   controller, then run one command or the interactive shell.

mod shell;
mod terminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradebook_core::db::open_db;
use gradebook_core::{
    core_version, default_log_level, init_logging, KeyValueStore, RosterController,
    SqliteKeyValueStore, DEFAULT_STORAGE_KEY,
};
use log::info;
use shell::ShellController;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use terminal::{NoticeMode, TableRenderer, TerminalNotifier};

// Exit status for a submission rejected by validation.
const EXIT_REJECTED: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "gradebook", version, about = "Student grade roster")]
struct Cli {
    /// SQLite file holding the roster.
    #[arg(long, env = "GRADEBOOK_DB", default_value = "gradebook.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; logging is off when unset.
    #[arg(long, env = "GRADEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// One of trace|debug|info|warn|error.
    #[arg(long, env = "GRADEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a student with three scores in [0, 10].
    Add {
        #[arg(allow_hyphen_values = true)]
        name: String,
        #[arg(allow_hyphen_values = true)]
        score1: String,
        #[arg(allow_hyphen_values = true)]
        score2: String,
        #[arg(allow_hyphen_values = true)]
        score3: String,
    },
    /// Show the roster.
    List,
    /// Remove the student at a roster position.
    Delete {
        #[arg(allow_negative_numbers = true)]
        position: i64,
    },
    /// Clear the stored roster.
    Reset,
    /// Start an interactive session.
    Shell,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open gradebook database `{}`", cli.db.display()))?;
    let kv = SqliteKeyValueStore::new(&conn);

    match cli.command {
        Command::Reset => reset(kv).map(|()| ExitCode::SUCCESS),
        Command::Shell => {
            let mut controller = RosterController::open(
                kv,
                TerminalNotifier::new(NoticeMode::StatusLine),
                TableRenderer,
            );
            shell::run(&mut controller).context("interactive shell failed")?;
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let mut controller = RosterController::open(
                kv,
                TerminalNotifier::new(NoticeMode::Immediate),
                TableRenderer,
            );
            Ok(match run_single(&mut controller, command) {
                CommandOutcome::Done => ExitCode::SUCCESS,
                CommandOutcome::Rejected => ExitCode::from(EXIT_REJECTED),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandOutcome {
    Done,
    /// Input failed validation; the notifier has already reported why.
    Rejected,
}

fn run_single<S: KeyValueStore>(
    controller: &mut ShellController<S>,
    command: Command,
) -> CommandOutcome {
    match command {
        Command::Add {
            name,
            score1,
            score2,
            score3,
        } => match controller.submit(&name, &score1, &score2, &score3) {
            Ok(_) => CommandOutcome::Done,
            Err(err) => {
                info!(
                    "event=cli_add module=cli status=rejected error_code={}",
                    err.code()
                );
                CommandOutcome::Rejected
            }
        },
        Command::Delete { position } => {
            shell::delete_at(controller, position);
            CommandOutcome::Done
        }
        Command::List | Command::Reset | Command::Shell => CommandOutcome::Done,
    }
}

fn reset(mut kv: SqliteKeyValueStore<'_>) -> Result<()> {
    kv.remove_item(DEFAULT_STORAGE_KEY)
        .context("failed to clear stored roster")?;
    info!("event=roster_reset module=cli status=ok");
    println!("roster cleared");
    Ok(())
}

fn setup_logging(cli: &Cli) {
    let Some(log_dir) = cli.log_dir.as_deref() else {
        return;
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());

    let result = absolute_dir(log_dir).and_then(|dir| {
        let dir = dir
            .to_str()
            .ok_or_else(|| format!("log dir `{}` is not valid UTF-8", dir.display()))?
            .to_string();
        init_logging(level, &dir)
    });

    match result {
        Ok(()) => info!(
            "event=cli_start module=cli status=ok version={}",
            core_version()
        ),
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf, String> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|err| format!("cannot resolve log dir `{}`: {err}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::{run_single, Cli, Command, CommandOutcome};
    use crate::terminal::{NoticeMode, TableRenderer, TerminalNotifier};
    use clap::Parser;
    use gradebook_core::db::open_db_in_memory;
    use gradebook_core::{RosterController, SqliteKeyValueStore};

    fn add(name: &str, scores: [&str; 3]) -> Command {
        Command::Add {
            name: name.to_string(),
            score1: scores[0].to_string(),
            score2: scores[1].to_string(),
            score3: scores[2].to_string(),
        }
    }

    #[test]
    fn add_accepts_negative_scores_and_dash_names_as_values() {
        let cli = Cli::try_parse_from(["gradebook", "add", "Ana", "-1", "5", "5"]).unwrap();
        match cli.command {
            Command::Add { name, score1, .. } => {
                assert_eq!(name, "Ana");
                assert_eq!(score1, "-1");
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["gradebook", "add", "-Ana", "7", "8", "9"]).unwrap();
        assert!(matches!(cli.command, Command::Add { name, .. } if name == "-Ana"));
    }

    #[test]
    fn rejected_add_is_reported_as_failure() {
        let conn = open_db_in_memory().unwrap();
        let mut controller = RosterController::open(
            SqliteKeyValueStore::new(&conn),
            TerminalNotifier::new(NoticeMode::StatusLine),
            TableRenderer,
        );

        let negative = run_single(&mut controller, add("Ana", ["-1", "5", "5"]));
        let valid = run_single(&mut controller, add("Ana", ["7", "8", "9"]));

        assert_eq!(negative, CommandOutcome::Rejected);
        assert_eq!(valid, CommandOutcome::Done);
        assert_eq!(controller.records().len(), 1);
    }
}
