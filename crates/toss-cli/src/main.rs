//! toss - reversible delete from the command line.

use clap::Parser;
use std::io;
use toss_bin::HoldingArea;
use toss_cli::commands;
use toss_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> toss_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let paths = config.bin_paths(cli.root.clone())?;
    tracing::debug!(files_dir = %paths.files_dir.display(), ledger = %paths.ledger_path.display(), "opening bin");
    let mut bin = HoldingArea::open(paths)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    match cli.command {
        None => commands::execute_toss(&cli.paths, &mut bin, &formatter, &mut out)?,
        Some(Command::List) => commands::execute_list(&bin, &formatter, &mut out)?,
        Some(Command::Restore(args)) => {
            commands::execute_restore(args, &mut bin, &formatter, &mut input, &mut out)?
        }
        Some(Command::Empty(args)) => {
            commands::execute_empty(args, &mut bin, &formatter, &mut input, &mut out)?
        }
        Some(Command::Mem) => commands::execute_mem(&bin, &formatter, &mut out)?,
        Some(Command::Reconcile) => commands::execute_reconcile(&bin, &formatter, &mut out)?,
    }

    Ok(())
}

/// Log to stderr. `TOSS_LOG` takes an `EnvFilter` directive; `--verbose`
/// forces debug.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TOSS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
