//! Embeddable command-line surface.
//!
//! Migrations are code owned by the embedding application, so there is
//! no standalone binary; instead an application hands its
//! [`MigrationList`] to [`run`] from a two-line `main`. The commands
//! map 1:1 onto the manager operations: `up` performs migrations,
//! `down` reverses to a checkpoint, `delete` tears the table down.
//!
//! # Examples
//!
//! ```no_run
//! use tabula::MigrationList;
//!
//! #[tokio::main]
//! async fn main() {
//!     let migrations = MigrationList::empty();
//!     std::process::exit(tabula::cli::run(&migrations).await);
//! }
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigLoader;
use crate::error::Error;
use crate::logging::init_logger;
use crate::manager::TableManager;
use crate::migrations::MigrationList;

/// Command-line tool for managing a deployment-scoped table.
#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about = "Manage a deployment-scoped table and its migrations", long_about = None)]
pub struct Cli {
    /// Deployment to operate on (defaults to TABULA_DEPLOYMENT, then local)
    #[arg(long, global = true, value_name = "NAME")]
    pub deployment: Option<String>,

    /// Path to the package configuration file
    #[arg(long, global = true, value_name = "PATH", env = "TABULA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Apply all pending migrations (bootstrapping the table first)
    Up,

    /// Reverse migrations down to a named checkpoint
    Down {
        /// Migration to leave as the latest applied
        migration: String,
    },

    /// Delete the table with all its data
    Delete,

    /// Start the local store emulator
    #[cfg(feature = "local-emulator")]
    StartLocal,

    /// Stop the local store emulator
    #[cfg(feature = "local-emulator")]
    StopLocal,
}

/// Exit code for an error surfaced by the CLI.
///
/// Exit codes:
/// - 1: operational failure (store, transport, migration step)
/// - 2: configuration error
/// - 3: unknown down-migration target
/// - 4: credential resolution failure
/// - 5: table never became active
#[must_use]
pub fn exit_code(error: &Error) -> i32 {
    match error {
        Error::Configuration { .. } | Error::ConfigFile(_) => 2,
        Error::UnknownMigration { .. } => 3,
        Error::CredentialResolution { .. } => 4,
        Error::TableNotReady { .. } => 5,
        _ => 1,
    }
}

/// Parses arguments from the process environment and executes the
/// selected command with the given migrations.
///
/// Returns the process exit code; `0` on success.
pub async fn run(migrations: &MigrationList) -> i32 {
    let cli = Cli::parse();
    execute(cli, migrations).await
}

/// Executes a parsed command with the given migrations.
pub async fn execute(cli: Cli, migrations: &MigrationList) -> i32 {
    let logger = init_logger(cli.verbose, cli.quiet);

    let result = async {
        let config = match &cli.config {
            Some(path) => ConfigLoader::load_file(path)?,
            None => ConfigLoader::load(&std::env::current_dir()?)?,
        };
        let manager = TableManager::new(config)?;
        let deployment = cli.deployment.as_deref();

        match cli.command {
            Command::Up => {
                let table = manager.table_name(deployment)?;
                manager.connect(migrations, deployment).await?;
                logger.info(&format!("table {table} bootstrapped and migrated"));
            }
            Command::Down { ref migration } => {
                manager
                    .migrate_down_to(migration, migrations, deployment)
                    .await?;
                logger.info(&format!("migrated down to {migration}"));
            }
            Command::Delete => {
                let table = manager.table_name(deployment)?;
                manager.delete_table(deployment).await?;
                logger.info(&format!("table {table} deleted"));
            }
            #[cfg(feature = "local-emulator")]
            Command::StartLocal => {
                manager.start_local().await?;
                logger.info("local store emulator started");
            }
            #[cfg(feature = "local-emulator")]
            Command::StopLocal => {
                manager.stop_local().await?;
                logger.info("local store emulator stopped");
            }
        }
        Ok::<(), Error>(())
    }
    .await;

    match result {
        Ok(()) => 0,
        Err(error) => {
            logger.error(&format!("{error}"));
            exit_code(&error)
        }
    }
}
