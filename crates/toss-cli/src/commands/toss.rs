//! Toss command implementation.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::io::Write;
use std::path::PathBuf;
use toss_bin::HoldingArea;
use toss_domain::Entry;

/// Execute the toss command.
///
/// Every path is attempted. Failures are reported on stderr as they happen
/// and turn the whole command into an error once the batch is done.
pub fn execute_toss<W: Write>(
    paths: &[PathBuf],
    bin: &mut HoldingArea,
    formatter: &Formatter,
    out: &mut W,
) -> Result<()> {
    let report = bin.toss_all(paths);

    for (path, error) in report.failures() {
        eprintln!("{}", formatter.error(&format!("{}: {}", path.display(), error)));
    }

    let tossed: Vec<Entry> = report.tossed().cloned().collect();
    match formatter.format() {
        OutputFormat::Table => {
            for entry in &tossed {
                writeln!(
                    out,
                    "{}",
                    formatter.success(&format!("tossed: {}", entry.original_path.display()))
                )?;
            }
        }
        OutputFormat::Json | OutputFormat::Quiet => {
            writeln!(out, "{}", formatter.format_entries(&tossed)?)?;
        }
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: paths.len(),
        });
    }
    Ok(())
}
