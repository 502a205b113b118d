//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: start the worker in the foreground (default)
//! - once: run a single polling pass and exit
//! - due: print the obligations currently due

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recurd - recurring-obligation worker
#[derive(Parser, Debug)]
#[command(name = "recurd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the worker in the foreground until SIGINT/SIGTERM
    Run,

    /// Run a single polling pass and exit
    Once,

    /// List the ids of obligations currently due
    Due,
}
