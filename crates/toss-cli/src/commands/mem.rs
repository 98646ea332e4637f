//! Mem command implementation.

use crate::error::Result;
use crate::output::Formatter;
use std::io::Write;
use toss_bin::HoldingArea;

/// Execute the mem command.
pub fn execute_mem<W: Write>(bin: &HoldingArea, formatter: &Formatter, out: &mut W) -> Result<()> {
    writeln!(out, "{}", formatter.format_usage(bin.usage())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture::Fixture;

    #[test]
    fn test_mem_reports_bin_usage() {
        let mut fx = Fixture::new();
        let file = fx.write("big.bin", &"x".repeat(2048));
        fx.bin.toss(&file).unwrap();

        let mut out = Vec::new();
        execute_mem(&fx.bin, &fx.formatter, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "bin usage: 2.0KB\n");
    }
}
