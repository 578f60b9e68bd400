//! Binary entry point for roster.
//!
//! This binary provides the CLI interface for the student record manager.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use roster::cli::{self, Session, StudentArgs};
use roster::observability::{self, LogLevel, Logger};
use roster::{LoggingConfig, RosterConfig, SharedLevel};
use std::path::PathBuf;
use std::process::ExitCode;

/// Roster - a student record manager.
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Student data file (overrides configuration).
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Add a student.
    Add {
        #[command(flatten)]
        student: StudentArgs,
    },

    /// Replace a student's fields, keeping recorded scores.
    Update {
        /// Id of the student to update.
        target: String,

        #[command(flatten)]
        student: StudentArgs,
    },

    /// Delete a student by id.
    Delete {
        /// Student id.
        id: String,
    },

    /// Delete a student by exact name.
    DeleteByName {
        /// Student name.
        name: String,

        /// Candidate to delete when several share the name (1-based).
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Show one student.
    Show {
        /// Student id.
        id: String,
    },

    /// Find students by name.
    Find {
        /// Name or part of a name.
        name: String,

        /// Match the whole name only.
        #[arg(long)]
        exact: bool,
    },

    /// List all students.
    List,

    /// Sort the data file by student id.
    Sort,

    /// Record a score.
    Score {
        /// Student id.
        id: String,
        /// Subject name.
        subject: String,
        /// Score between 0 and 100.
        score: f64,
    },

    /// Show a student's scores and average.
    Report {
        /// Student id.
        id: String,
    },

    /// Write a copy sorted by id to another file.
    Export {
        /// Output file.
        path: PathBuf,
    },

    /// Replace the roster with the contents of another file.
    Import {
        /// Input file.
        path: PathBuf,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            let _ = observability::init(&LoggingConfig::default());
            Logger::new("roster", LogLevel::Info, &SharedLevel::default())
                .fatal(format!("failed to load configuration: {e}"));
        },
    };

    if let Err(e) = observability::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let global = config.logging.shared_level();
    match run_command(cli.command, &config, &global) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration and applies environment and flag overrides.
fn load_config(cli: &Cli) -> roster::Result<RosterConfig> {
    let config = match &cli.config {
        Some(path) => RosterConfig::load_from_file(path)?,
        None => RosterConfig::load_default()?,
    };
    let mut config = config.with_env_overrides()?;

    if let Some(file) = &cli.file {
        config.data_file.clone_from(file);
    }
    if cli.verbose {
        config.logging.global_level = LogLevel::Debug;
    }
    Ok(config)
}

/// Runs the selected command.
fn run_command(
    command: Commands,
    config: &RosterConfig,
    global: &SharedLevel,
) -> roster::Result<()> {
    let mut session = Session::open(config, global)?;

    match command {
        Commands::Add { student } => cli::add(&mut session, student),
        Commands::Update { target, student } => cli::update(&mut session, &target, student),
        Commands::Delete { id } => cli::delete(&mut session, &id),
        Commands::DeleteByName { name, pick } => cli::delete_by_name(&mut session, &name, pick),
        Commands::Show { id } => cli::show(&session, &id),
        Commands::Find { name, exact } => cli::find(&session, &name, exact),
        Commands::List => cli::list(&session),
        Commands::Sort => cli::sort(&mut session),
        Commands::Score { id, subject, score } => cli::score(&mut session, &id, &subject, score),
        Commands::Report { id } => cli::report(&session, &id),
        Commands::Export { path } => cli::export(&mut session, &path),
        Commands::Import { path } => cli::import(&mut session, &path),
    }
}
