//! Interactive prompts.
//!
//! Generic over the reader and writer so commands can be driven from tests
//! with in-memory buffers.

use crate::error::{CliError, Result};
use crate::output::format_timestamp;
use std::io::{BufRead, Write};
use toss_domain::Entry;

/// Ask a yes/no question. Only `y` or `yes` (any case) count as yes; end of
/// input counts as no.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Number the entries and let the user choose one.
pub fn pick_entry<'a, R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    entries: &'a [Entry],
) -> Result<&'a Entry> {
    writeln!(output, "Multiple matches found:")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            output,
            "  {}) {}  ({})",
            i + 1,
            entry.original_path.display(),
            format_timestamp(&entry.tossed_at)
        )?;
    }
    write!(output, "Choose [1-{}]: ", entries.len())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    line.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| entries.get(i))
        .ok_or_else(|| CliError::InvalidInput("invalid selection".to_string()))
}
