//! Holding-area operations: toss, restore, empty
//!
//! Each operation is two steps, a filesystem move and a ledger write, with no
//! transaction around them. The windows this leaves are reported, never
//! papered over:
//!
//! | Operation | Step 1 fails          | Step 2 fails                        |
//! |-----------|-----------------------|-------------------------------------|
//! | toss      | nothing changed       | object in bin, untracked (orphan)   |
//! | restore   | nothing changed       | object restored, record left behind |
//! | empty     | bin partly deleted    | bin empty, records left behind      |

use crate::error::{BinError, MoveError, Result};
use crate::mover::{self, ObjectMover};
use crate::paths::BinPaths;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use toss_domain::{sanitize_bin_name, Entry, EntryId, Ledger};
use toss_store::SqliteLedger;

/// The bin: a files directory plus the ledger describing it
///
/// # Examples
///
/// ```no_run
/// use toss_bin::{BinPaths, HoldingArea};
///
/// # fn main() -> toss_bin::Result<()> {
/// let mut bin = HoldingArea::open(BinPaths::under("/home/me/.toss"))?;
/// for entry in bin.search("report")? {
///     println!("{} -> {}", entry.bin_name, entry.original_path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct HoldingArea<L = SqliteLedger> {
    paths: BinPaths,
    ledger: L,
    mover: ObjectMover,
}

/// Per-path outcome of [`HoldingArea::toss_all`]
#[derive(Debug)]
pub struct BatchReport {
    /// Every submitted path with what happened to it, in submission order
    pub outcomes: Vec<(PathBuf, Result<Entry>)>,
}

impl BatchReport {
    /// Entries that were tossed and recorded
    pub fn tossed(&self) -> impl Iterator<Item = &Entry> {
        self.outcomes.iter().filter_map(|(_, r)| r.as_ref().ok())
    }

    /// Paths that failed, with the reason
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &BinError)> {
        self.outcomes
            .iter()
            .filter_map(|(p, r)| r.as_ref().err().map(|e| (p.as_path(), e)))
    }

    /// True when every path was tossed
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, r)| r.is_ok())
    }
}

impl HoldingArea<SqliteLedger> {
    /// Open the bin described by `paths`, creating the files directory and
    /// the ledger if they do not exist yet.
    pub fn open(paths: BinPaths) -> Result<Self> {
        fs::create_dir_all(&paths.files_dir).map_err(|e| BinError::io(&paths.files_dir, e))?;
        let ledger = SqliteLedger::open(&paths.ledger_path).map_err(BinError::ledger)?;
        Ok(Self::with_ledger(paths, ledger, ObjectMover::new()))
    }
}

impl<L> HoldingArea<L>
where
    L: Ledger,
    L::Error: std::error::Error + Send + Sync + 'static,
{
    /// Assemble a bin from parts. The files directory is created lazily on
    /// the first toss.
    pub fn with_ledger(paths: BinPaths, ledger: L, mover: ObjectMover) -> Self {
        Self {
            paths,
            ledger,
            mover,
        }
    }

    /// Locations this bin works with
    pub fn paths(&self) -> &BinPaths {
        &self.paths
    }

    /// Move `path` into the bin and record it.
    ///
    /// If the move succeeds but the record cannot be written, the object
    /// stays in the bin untracked and [`BinError::OrphanedObject`] says where.
    pub fn toss(&mut self, path: impl AsRef<Path>) -> Result<Entry> {
        let path = mover::absolute(path.as_ref())?;
        if self.paths.resolved().overlaps(&path) {
            return Err(BinError::Refused(path));
        }
        if path.to_str().is_none() {
            return Err(MoveError::InvalidSource(path).into());
        }

        let id = EntryId::new();
        let moved = self.mover.move_into(&path, &self.paths.files_dir, id)?;
        let bin_path = moved.destination.clone();
        let entry = moved.into_entry(Utc::now());

        if let Err(e) = self.ledger.append(&entry) {
            tracing::error!(
                bin_path = %bin_path.display(),
                original = %entry.original_path.display(),
                error = %e,
                "object moved into bin but not recorded"
            );
            return Err(BinError::OrphanedObject {
                bin_path,
                original_path: entry.original_path,
                source: Box::new(e),
            });
        }

        tracing::info!(id = %entry.id, original = %entry.original_path.display(), "tossed");
        Ok(entry)
    }

    /// Toss each path in turn. A failure on one path does not stop the rest.
    pub fn toss_all<I, P>(&mut self, paths: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let outcomes = paths
            .into_iter()
            .map(|p| {
                let p = p.as_ref().to_path_buf();
                let result = self.toss(&p);
                if let Err(e) = &result {
                    tracing::warn!(path = %p.display(), error = %e, "toss failed");
                }
                (p, result)
            })
            .collect();

        BatchReport { outcomes }
    }

    /// Put `entry` back where it came from and forget it.
    ///
    /// Missing parent directories are recreated. If something already exists
    /// at the original path the restore fails and nothing changes. If the
    /// object is moved back but the record cannot be removed,
    /// [`BinError::StaleRecord`] is returned.
    pub fn restore(&mut self, entry: &Entry) -> Result<()> {
        let source = self.object_path(entry)?;

        self.mover.restore_move(&source, &entry.original_path)?;

        if let Err(e) = self.ledger.remove(entry.id) {
            tracing::error!(
                id = %entry.id,
                original = %entry.original_path.display(),
                error = %e,
                "object restored but record not removed"
            );
            return Err(BinError::StaleRecord {
                id: entry.id,
                original_path: entry.original_path.clone(),
                source: Box::new(e),
            });
        }

        tracing::info!(id = %entry.id, original = %entry.original_path.display(), "restored");
        Ok(())
    }

    /// Where `entry`'s object lives in the bin. The stored bin name is cut
    /// down to its final component; a name with none is
    /// [`MoveError::InvalidSource`].
    pub fn object_path(&self, entry: &Entry) -> Result<PathBuf> {
        let bin_name = sanitize_bin_name(&entry.bin_name)
            .ok_or_else(|| MoveError::InvalidSource(PathBuf::from(&entry.bin_name)))?;
        Ok(self.paths.bin_path(bin_name))
    }

    /// Permanently delete everything in the bin and clear the ledger.
    ///
    /// Emptying an empty bin succeeds and leaves an empty files directory.
    pub fn empty(&mut self) -> Result<()> {
        let files_dir = &self.paths.files_dir;

        match fs::remove_dir_all(files_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(BinError::io(files_dir, e)),
        }
        fs::create_dir_all(files_dir).map_err(|e| BinError::io(files_dir, e))?;

        self.ledger.clear().map_err(BinError::ledger)?;

        tracing::info!(files_dir = %files_dir.display(), "bin emptied");
        Ok(())
    }

    /// Every entry, oldest toss first
    pub fn list(&self) -> Result<Vec<Entry>> {
        self.ledger.all().map_err(BinError::ledger)
    }

    /// Entries whose original path or bin name contains `text`, ignoring case
    pub fn search(&self, text: &str) -> Result<Vec<Entry>> {
        self.ledger.find_by_query(text).map_err(BinError::ledger)
    }

    /// Bytes of regular files currently in the bin
    pub fn usage(&self) -> u64 {
        mover::tree_size(&self.paths.files_dir)
    }
}
