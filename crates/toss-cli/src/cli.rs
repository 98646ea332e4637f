//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// toss - move files into a recoverable bin instead of deleting them.
#[derive(Debug, Parser)]
#[command(name = "toss")]
#[command(version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Files or directories to toss
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Holding-area root (default: ~/.toss)
    #[arg(long, env = "TOSS_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all tossed items
    List,

    /// Restore a tossed item to its original location
    Restore(RestoreArgs),

    /// Permanently delete all tossed items
    Empty(EmptyArgs),

    /// Show disk space used by the bin
    Mem,

    /// Check the bin against the ledger without changing anything
    Reconcile,
}

/// Arguments for the restore command.
#[derive(Debug, Parser)]
pub struct RestoreArgs {
    /// Text to look for in the original path or bin name
    pub query: Option<String>,
}

/// Arguments for the empty command.
#[derive(Debug, Parser)]
pub struct EmptyArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
