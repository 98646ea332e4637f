//! Reconcile command implementation.

use crate::error::Result;
use crate::output::Formatter;
use std::io::Write;
use toss_bin::HoldingArea;

/// Execute the reconcile command. Reports drift; never repairs it.
pub fn execute_reconcile<W: Write>(
    bin: &HoldingArea,
    formatter: &Formatter,
    out: &mut W,
) -> Result<()> {
    let report = bin.reconcile()?;
    writeln!(out, "{}", formatter.format_report(&report)?)?;
    Ok(())
}
