//! List command implementation.

use crate::error::Result;
use crate::output::Formatter;
use std::io::Write;
use toss_bin::HoldingArea;

/// Execute the list command.
pub fn execute_list<W: Write>(bin: &HoldingArea, formatter: &Formatter, out: &mut W) -> Result<()> {
    let entries = bin.list()?;
    writeln!(out, "{}", formatter.format_entries(&entries)?)?;
    Ok(())
}
