//! Holding-area layout

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding tossed objects, relative to the bin root
pub const FILES_DIR: &str = "files";

/// Ledger file name, relative to the bin root
pub const LEDGER_FILE: &str = "ledger";

/// The two locations the engine works with.
///
/// Passed explicitly to [`HoldingArea::open`](crate::HoldingArea::open); the
/// engine never looks at the environment or the home directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinPaths {
    /// Directory containing `<id>-<basename>` objects
    pub files_dir: PathBuf,

    /// SQLite ledger file
    pub ledger_path: PathBuf,
}

impl BinPaths {
    /// Standard layout under `root`: `root/files` and `root/ledger`.
    ///
    /// ```
    /// use toss_bin::BinPaths;
    /// use std::path::Path;
    ///
    /// let paths = BinPaths::under("/home/me/.toss");
    /// assert_eq!(paths.files_dir, Path::new("/home/me/.toss/files"));
    /// assert_eq!(paths.ledger_path, Path::new("/home/me/.toss/ledger"));
    /// ```
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            files_dir: root.join(FILES_DIR),
            ledger_path: root.join(LEDGER_FILE),
        }
    }

    /// Where an object named `bin_name` lives.
    pub fn bin_path(&self, bin_name: &str) -> PathBuf {
        self.files_dir.join(bin_name)
    }

    /// Directory holding both the files directory and the ledger, when they
    /// share one (always the case for [`BinPaths::under`]).
    pub fn root(&self) -> Option<&Path> {
        let root = self.files_dir.parent()?;
        (self.ledger_path.parent() == Some(root)).then_some(root)
    }

    /// The same layout with `..`, `.` and symlinked directories resolved, so
    /// it can be compared against paths from [`normalize`]. Locations that do
    /// not exist yet are kept as given.
    pub fn resolved(&self) -> Self {
        let resolve = |p: &Path| normalize(p).unwrap_or_else(|_| p.to_path_buf());
        Self {
            files_dir: resolve(&self.files_dir),
            ledger_path: resolve(&self.ledger_path),
        }
    }

    /// True when tossing `path` would move part of the bin: the bin root or
    /// anything inside it, the files directory, the ledger, or a directory
    /// containing any of them.
    pub fn overlaps(&self, path: &Path) -> bool {
        if let Some(root) = self.root() {
            if path.starts_with(root) {
                return true;
            }
        }
        path.starts_with(&self.files_dir)
            || self.files_dir.starts_with(path)
            || self.ledger_path.starts_with(path)
    }
}

/// Absolute, `..`-free form of `path`.
///
/// The parent directory is canonicalized and the final component re-joined
/// untouched, so a symlink named by `path` is kept rather than followed. A
/// path whose last component is `..` (or that is the filesystem root) is
/// canonicalized whole.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => Ok(fs::canonicalize(parent)?.join(name)),
        _ => fs::canonicalize(&absolute),
    }
}
