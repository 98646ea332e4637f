//! Empty command implementation.

use crate::cli::EmptyArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::prompt::confirm;
use std::io::{BufRead, Write};
use toss_bin::HoldingArea;

/// Execute the empty command.
pub fn execute_empty<R: BufRead, W: Write>(
    args: EmptyArgs,
    bin: &mut HoldingArea,
    formatter: &Formatter,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let count = bin.list()?.len();
    if count == 0 {
        writeln!(out, "{}", formatter.info("bin is already empty"))?;
        return Ok(());
    }

    if !args.force {
        let prompt = format!("Permanently delete {} item(s)?", count);
        if !confirm(input, out, &prompt)? {
            writeln!(out, "{}", formatter.info("aborted"))?;
            return Ok(());
        }
    }

    bin.empty()?;
    writeln!(
        out,
        "{}",
        formatter.success(&format!("permanently deleted {} item(s)", count))
    )?;
    Ok(())
}
