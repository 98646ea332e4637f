//! toss CLI library.
//!
//! Argument parsing, configuration, prompts and output formatting for the
//! `toss` binary. The holding-area engine itself lives in `toss-bin`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod prompt;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
