//! Restore command implementation.

use crate::cli::RestoreArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::prompt::{confirm, pick_entry};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use toss_bin::{BinError, HoldingArea, MoveError};
use toss_domain::Entry;

/// Execute the restore command.
///
/// Without a query every entry is a candidate. A single candidate is
/// restored directly; several are offered as a numbered list. If something
/// now occupies the original path the user must agree to replace it.
pub fn execute_restore<R: BufRead, W: Write>(
    args: RestoreArgs,
    bin: &mut HoldingArea,
    formatter: &Formatter,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let entries = match args.query.as_deref() {
        Some(query) => bin.search(query)?,
        None => bin.list()?,
    };

    let entry = match entries.as_slice() {
        [] => return Err(CliError::NoMatch),
        [only] => only,
        many => pick_entry(input, out, many)?,
    };

    let original = &entry.original_path;
    if fs::symlink_metadata(original).is_ok() {
        let prompt = format!("{} already exists. Overwrite?", original.display());
        if !confirm(input, out, &prompt)? {
            writeln!(out, "{}", formatter.info("aborted"))?;
            return Ok(());
        }
        replace_with_restored(bin, entry)?;
    } else {
        bin.restore(entry)?;
    }

    writeln!(
        out,
        "{}",
        formatter.success(&format!("restored: {}", original.display()))
    )?;
    Ok(())
}

/// Restore `entry` over the object now at its original path.
///
/// The existing object is only set aside until the restore has succeeded. If
/// the restore fails and the original path is still free, it is put back.
fn replace_with_restored(bin: &mut HoldingArea, entry: &Entry) -> Result<()> {
    let original = &entry.original_path;

    let object = bin.object_path(entry)?;
    fs::symlink_metadata(&object).map_err(|e| BinError::from(MoveError::from_io(&object, e)))?;

    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let aside = original.with_file_name(format!(".{}.toss-{}", name, entry.id));
    fs::rename(original, &aside)?;
    tracing::debug!(path = %original.display(), aside = %aside.display(), "existing object set aside");

    match bin.restore(entry) {
        Ok(()) => {
            remove_existing(&aside)?;
            Ok(())
        }
        Err(e) => {
            if fs::symlink_metadata(original).is_err() {
                fs::rename(&aside, original)?;
            } else {
                // Restored, only the record is left behind
                remove_existing(&aside)?;
            }
            Err(e.into())
        }
    }
}

/// Delete whatever is at `path`. Symlinks are removed, never followed.
fn remove_existing(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture::Fixture;
    use std::io::Cursor;

    fn restore(fx: &mut Fixture, query: Option<&str>, answers: &str) -> (Result<()>, String) {
        let args = RestoreArgs {
            query: query.map(str::to_string),
        };
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = execute_restore(args, &mut fx.bin, &fx.formatter, &mut input, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_no_match() {
        let mut fx = Fixture::new();
        let (result, _) = restore(&mut fx, Some("anything"), "");
        assert!(matches!(result, Err(CliError::NoMatch)));
    }

    #[test]
    fn test_single_match_restores_without_prompt() {
        let mut fx = Fixture::new();
        let file = fx.write("notes.txt", "hello");
        fx.bin.toss(&file).unwrap();

        let (result, shown) = restore(&mut fx, Some("notes"), "");
        result.unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "hello");
        assert!(shown.contains(&format!("restored: {}", file.display())));
        assert!(fx.bin.list().unwrap().is_empty());
    }

    #[test]
    fn test_several_matches_use_picker() {
        let mut fx = Fixture::new();
        let a = fx.write("a/report.txt", "first");
        let b = fx.write("b/report.txt", "second");
        fx.bin.toss(&a).unwrap();
        fx.bin.toss(&b).unwrap();

        let (result, shown) = restore(&mut fx, Some("report"), "2\n");
        result.unwrap();

        assert!(shown.contains("Multiple matches found:"));
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&b).unwrap(), "second");
        assert_eq!(fx.bin.list().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_pick_restores_nothing() {
        let mut fx = Fixture::new();
        let a = fx.write("a.txt", "a");
        let b = fx.write("b.txt", "b");
        fx.bin.toss(&a).unwrap();
        fx.bin.toss(&b).unwrap();

        let (result, _) = restore(&mut fx, None, "9\n");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert_eq!(fx.bin.list().unwrap().len(), 2);
    }

    #[test]
    fn test_declined_overwrite_aborts() {
        let mut fx = Fixture::new();
        let file = fx.write("notes.txt", "tossed");
        fx.bin.toss(&file).unwrap();
        fx.write("notes.txt", "newer");

        let (result, shown) = restore(&mut fx, None, "n\n");
        result.unwrap();

        assert!(shown.contains("already exists. Overwrite? [y/N]"));
        assert!(shown.contains("aborted"));
        assert_eq!(fs::read_to_string(&file).unwrap(), "newer");
        assert_eq!(fx.bin.list().unwrap().len(), 1);
    }

    #[test]
    fn test_overwrite_keeps_existing_file_when_bin_object_is_gone() {
        let mut fx = Fixture::new();
        let file = fx.write("notes.txt", "tossed");
        let entry = fx.bin.toss(&file).unwrap();
        fs::remove_file(fx.bin.paths().bin_path(&entry.bin_name)).unwrap();
        fx.write("notes.txt", "newer work");

        let (result, _) = restore(&mut fx, None, "y\n");

        assert!(matches!(
            result,
            Err(CliError::Bin(BinError::Move(MoveError::NotFound(_))))
        ));
        assert_eq!(fs::read_to_string(&file).unwrap(), "newer work");
        assert_eq!(fx.bin.list().unwrap().len(), 1);
    }

    fn leftovers(fx: &Fixture) -> Vec<String> {
        fs::read_dir(fx.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.contains(".toss-"))
            .collect()
    }

    #[test]
    fn test_accepted_overwrite_replaces_directory() {
        let mut fx = Fixture::new();
        let file = fx.write("thing", "tossed");
        fx.bin.toss(&file).unwrap();
        fx.write("thing/inner.txt", "in the way");

        let (result, _) = restore(&mut fx, Some("thing"), "y\n");
        result.unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "tossed");
        assert!(fx.bin.list().unwrap().is_empty());
        assert_eq!(leftovers(&fx), Vec::<String>::new());
    }
}
