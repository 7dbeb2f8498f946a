//! # Gradus CLI Module
//!
//! This module implements the CLI interface for Gradus.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP admin server
//! - `status` - Show a learner's full progress record
//! - `earn` - Award a stage stamp to a learner
//! - `capstone` - Record the capstone-completion signal
//! - `graduate` - Attempt graduation for a learner
//! - `extend` - Extend a graduate's access window
//! - `aptitude` - Run the aptitude assessment from an answers file
//! - `learners` - List all tracked learners
//! - `reset` - Delete a learner's record

mod commands;

use clap::{Parser, Subcommand};
use gradus_core::GradusError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Gradus - Learner Progress Server
///
/// A deterministic stamp ledger with a one-way graduation gate,
/// a fixed 180-day access window, and a five-persona aptitude engine.
#[derive(Parser, Debug)]
#[command(name = "gradus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the progress database
    #[arg(short = 'D', long, global = true, default_value = "gradus.db")]
    pub database: PathBuf,

    /// Storage backend: "redb" (ACID database) or "memory" (volatile)
    #[arg(short = 'B', long, global = true, default_value = "redb")]
    pub backend: String,

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
    /// Start the HTTP admin server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show a learner's full progress record
    Status {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,
    },

    /// Award a stage stamp
    Earn {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Stage slug (orientation, foundations, exploration, creation,
        /// validation, launch)
        #[arg(short, long)]
        stage: String,
    },

    /// Record the capstone-completion signal
    Capstone {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Opaque capstone summary
        #[arg(short, long, default_value = "")]
        summary: String,
    },

    /// Attempt graduation
    Graduate {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Optional cohort review text
        #[arg(short, long, default_value = "")]
        review: String,
    },

    /// Extend a graduate's access window (administrative)
    Extend {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Days to add (1..=365)
        #[arg(short, long)]
        days: i64,
    },

    /// Run the aptitude assessment from an answers file
    Aptitude {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Path to a JSON answers file: {"s1q1": "A", ...}
        #[arg(short, long)]
        file: PathBuf,

        /// Explicit question set (set1, set2, set3); omit to let the
        /// rotation rule pick
        #[arg(short, long)]
        set: Option<String>,
    },

    /// List all tracked learners
    Learners,

    /// Delete a learner's record
    Reset {
        /// Learner identifier
        #[arg(short, long)]
        learner: String,

        /// Skip the confirmation requirement
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GradusError> {
    let backend = cli.backend.as_str();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(&cli.database, backend, &host, port).await
        }
        Some(Commands::Status { learner }) => {
            cmd_status(&cli.database, backend, json_mode, &learner)
        }
        Some(Commands::Earn { learner, stage }) => {
            cmd_earn(&cli.database, backend, json_mode, &learner, &stage)
        }
        Some(Commands::Capstone { learner, summary }) => {
            cmd_capstone(&cli.database, backend, json_mode, &learner, &summary)
        }
        Some(Commands::Graduate { learner, review }) => {
            cmd_graduate(&cli.database, backend, json_mode, &learner, &review)
        }
        Some(Commands::Extend { learner, days }) => {
            cmd_extend(&cli.database, backend, json_mode, &learner, days)
        }
        Some(Commands::Aptitude { learner, file, set }) => {
            cmd_aptitude(&cli.database, backend, json_mode, &learner, &file, set.as_deref())
        }
        Some(Commands::Learners) => cmd_learners(&cli.database, backend, json_mode),
        Some(Commands::Reset { learner, force }) => {
            cmd_reset(&cli.database, backend, json_mode, &learner, force)
        }
        None => {
            // No subcommand - list learners by default
            cmd_learners(&cli.database, backend, json_mode)
        }
    }
}
