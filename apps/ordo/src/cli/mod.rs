//! # Ordo CLI Module
//!
//! This module implements the CLI interface for Ordo.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `list` - Show items (default when no command is given)
//! - `add` - Add an item
//! - `done` / `undone` - Set or clear the completed flag
//! - `archive` - Archive a completed item
//! - `delete` - Delete an item
//! - `move` - Move an active item to a new position
//! - `status` - Show item counts
//! - `init` - Create or migrate the database

mod commands;

use crate::config::{BackendKind, Config};
use clap::{Parser, Subcommand};
use ordo_core::OrdoError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Ordo - a small ordered task list
///
/// Items keep their order, completion and archival state in one SQLite table.
#[derive(Parser, Debug)]
#[command(name = "ordo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the SQLite database (default: todos.db)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Path to a TOML config file (default: ./ordo.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show items
    List {
        /// Also show archived items
        #[arg(short, long)]
        archived: bool,
    },

    /// Add an item at the end of the list
    Add {
        /// Item text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark an item completed
    Done { id: i64 },

    /// Mark an item not completed
    Undone { id: i64 },

    /// Archive a completed item
    Archive {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete an item permanently
    Delete {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Move an active item to a zero-based position
    Move { id: i64, to: usize },

    /// Show item counts
    Status,

    /// Create the database, or migrate an existing one
    Init {
        /// Delete any existing database first
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Config file and environment, then the global flags.
    pub fn resolve_config(&self) -> Result<Config, OrdoError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(database) = &self.database {
            config.database.clone_from(database);
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        Ok(config)
    }

    /// True when the command is the long-running server.
    #[must_use]
    pub fn is_server(&self) -> bool {
        matches!(self.command, Some(Commands::Server { .. }))
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and the resolved configuration.
pub async fn execute(cli: Cli, mut config: Config) -> Result<(), OrdoError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::List { archived }) => cmd_list(&config, json_mode, archived),
        Some(Commands::Add { text }) => cmd_add(&config, json_mode, &text.join(" ")),
        Some(Commands::Done { id }) => cmd_set_completed(&config, json_mode, id, true),
        Some(Commands::Undone { id }) => cmd_set_completed(&config, json_mode, id, false),
        Some(Commands::Archive { id, yes }) => cmd_archive(&config, json_mode, id, yes),
        Some(Commands::Delete { id, yes }) => cmd_delete(&config, json_mode, id, yes),
        Some(Commands::Move { id, to }) => cmd_move(&config, json_mode, id, to),
        Some(Commands::Status) => cmd_status(&config, json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        None => cmd_list(&config, json_mode, false),
    }
}

// =============================================================================
// TESTS
// =============================================================================
