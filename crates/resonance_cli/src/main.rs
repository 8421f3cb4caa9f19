//! Resonance journal command-line front end.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and bootstrap logging.
//! - Dispatch to use-case commands and map failures to exit codes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use resonance_core::{core_version, init_logging, AppConfig, ConfigOverrides, ServiceError};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

const EXIT_FAILURE: u8 = 1;
const EXIT_BAD_INPUT: u8 = 2;
const EXIT_NOT_FOUND: u8 = 3;

/// Record positive and negative resonance and track your level.
#[derive(Parser, Debug)]
#[command(name = "resonance")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Journal database file [env: RESONANCE_DB_PATH]
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files [env: RESONANCE_LOG_DIR]
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level, trace..error [env: RESONANCE_LOG_LEVEL]
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new entry
    Add(commands::AddArgs),

    /// List entries, newest first
    List(commands::ListArgs),

    /// Show one entry
    Show {
        /// Entry ID
        id: String,
    },

    /// Replace the note of an entry
    Edit {
        /// Entry ID
        id: String,

        /// New note text
        note: String,
    },

    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },

    /// Show the current resonance level
    Level,

    /// Import a legacy JSON export once
    Import(commands::ImportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::resolve(ConfigOverrides {
        db_path: cli.db,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
    })?;

    // The journal stays usable without file logs.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        core_version()
    );

    let ctx = commands::Context {
        db_path: config.db_path,
        json_output: cli.json,
    };
    commands::dispatch(cli.command, &ctx)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::NotFound(_)) => EXIT_NOT_FOUND,
        Some(service_err) if service_err.is_bad_input() => EXIT_BAD_INPUT,
        _ => EXIT_FAILURE,
    }
}
