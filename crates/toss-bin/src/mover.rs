//! Object mover - relocates files, directory trees and symlinks
//!
//! A move is attempted as a single `rename(2)`, which keeps content,
//! permission bits and symlink targets exactly. When source and destination
//! sit on different devices the rename fails with `EXDEV` and the mover falls
//! back to copying the tree and deleting the original.
//!
//! The copy never follows symlinks: links are recreated from their literal
//! target string, so relative, absolute and dangling links survive unchanged.
//! If the copy fails part way the original is left alone and the partial copy
//! is reported through [`MoveError::CrossVolumeFallbackFailure`]. Partial
//! copies are not rolled back.

use crate::error::MoveError;
use chrono::{DateTime, Utc};
use std::fs::{self, Metadata};
use std::io;
use std::os::unix::fs::{symlink, DirBuilderExt, PermissionsExt};
use std::path::{Path, PathBuf};
use toss_domain::{Entry, EntryId};
use walkdir::WalkDir;

/// Mode for parent directories recreated on restore (before umask)
const PARENT_DIR_MODE: u32 = 0o755;

/// What kind of object is being moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Regular file (or any other non-directory, non-link node)
    File,
    /// Directory tree
    Directory,
    /// Symbolic link, never followed
    Symlink,
}

impl ObjectKind {
    /// Classify from link-aware metadata.
    pub fn of(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// Outcome of moving an object into the bin
#[derive(Debug, Clone)]
pub struct Moved {
    /// Id the bin name was derived from
    pub id: EntryId,
    /// Absolute path the object was moved from
    pub original_path: PathBuf,
    /// `<id>-<basename>`
    pub bin_name: String,
    /// Full path inside the bin
    pub destination: PathBuf,
    /// What was moved
    pub kind: ObjectKind,
    /// Size at move time
    pub size_bytes: u64,
}

impl Moved {
    /// Turn the move result into a ledger entry stamped `tossed_at`.
    pub fn into_entry(self, tossed_at: DateTime<Utc>) -> Entry {
        Entry {
            id: self.id,
            original_path: self.original_path,
            bin_name: self.bin_name,
            tossed_at,
            is_dir: self.kind == ObjectKind::Directory,
            size_bytes: self.size_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Strategy {
    #[default]
    RenameFirst,
    CopyOnly,
}

/// Relocates filesystem objects
///
/// # Examples
///
/// ```no_run
/// use toss_bin::ObjectMover;
/// use toss_domain::EntryId;
///
/// let mover = ObjectMover::new();
/// let moved = mover.move_into("notes.txt".as_ref(), "/tmp/bin".as_ref(), EntryId::new()).unwrap();
/// mover.restore_move(&moved.destination, &moved.original_path).unwrap();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectMover {
    strategy: Strategy,
}

impl ObjectMover {
    /// Mover that renames when possible and copies across devices
    pub fn new() -> Self {
        Self::default()
    }

    /// Mover that always takes the copy-then-delete path, as if every move
    /// crossed a device boundary
    pub fn copying() -> Self {
        Self {
            strategy: Strategy::CopyOnly,
        }
    }

    /// Move `source` into `destination_parent` as `<id>-<basename>`.
    ///
    /// The parent directory is created if missing. Size is measured before
    /// the move: file length for files and links, recursive sum of regular
    /// files for directories.
    pub fn move_into(
        &self,
        source: &Path,
        destination_parent: &Path,
        id: EntryId,
    ) -> Result<Moved, MoveError> {
        let original_path = absolute(source)?;
        let metadata = lstat(&original_path)?;
        let kind = ObjectKind::of(&metadata);

        let bin_name = Entry::bin_name_for(id, &original_path)
            .ok_or_else(|| MoveError::InvalidSource(original_path.clone()))?;

        fs::create_dir_all(destination_parent)
            .map_err(|e| MoveError::from_io(destination_parent, e))?;
        let destination = destination_parent.join(&bin_name);

        let size_bytes = match kind {
            ObjectKind::Directory => tree_size(&original_path),
            ObjectKind::File | ObjectKind::Symlink => metadata.len(),
        };

        self.relocate(&original_path, &destination, kind)?;

        tracing::debug!(
            from = %original_path.display(),
            to = %destination.display(),
            ?kind,
            size_bytes,
            "moved into bin"
        );

        Ok(Moved {
            id,
            original_path,
            bin_name,
            destination,
            kind,
            size_bytes,
        })
    }

    /// Move `source` back to `destination`, recreating missing parents.
    ///
    /// Fails with [`MoveError::DestinationExists`] rather than overwrite
    /// anything already at `destination`.
    pub fn restore_move(&self, source: &Path, destination: &Path) -> Result<(), MoveError> {
        let metadata = lstat(source)?;

        match fs::symlink_metadata(destination) {
            Ok(_) => return Err(MoveError::DestinationExists(destination.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(MoveError::from_io(destination, e)),
        }

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(PARENT_DIR_MODE)
                .create(parent)
                .map_err(|e| MoveError::from_io(parent, e))?;
        }

        self.relocate(source, destination, ObjectKind::of(&metadata))?;

        tracing::debug!(
            from = %source.display(),
            to = %destination.display(),
            "moved out of bin"
        );
        Ok(())
    }

    fn relocate(&self, source: &Path, destination: &Path, kind: ObjectKind) -> Result<(), MoveError> {
        if self.strategy == Strategy::CopyOnly {
            return copy_then_delete(source, destination, kind);
        }

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::warn!(
                    from = %source.display(),
                    to = %destination.display(),
                    "rename crosses devices, copying instead"
                );
                copy_then_delete(source, destination, kind)
            }
            Err(e) => Err(MoveError::from_io(source, e)),
        }
    }
}

/// Resolve `path` against the current directory, collapsing `..` and
/// symlinked parents but never following the final component.
pub fn absolute(path: &Path) -> Result<PathBuf, MoveError> {
    crate::paths::normalize(path).map_err(|e| MoveError::from_io(path, e))
}

fn lstat(path: &Path) -> Result<Metadata, MoveError> {
    fs::symlink_metadata(path).map_err(|e| MoveError::from_io(path, e))
}

/// Sum of regular-file sizes under `root`.
///
/// Links and directory nodes count for nothing. Entries that cannot be read
/// are skipped.
pub fn tree_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry while sizing");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Copy `source` to `destination`, then delete `source`.
///
/// The original is only touched once the whole copy has succeeded.
pub fn copy_then_delete(source: &Path, destination: &Path, kind: ObjectKind) -> Result<(), MoveError> {
    let copied = match kind {
        ObjectKind::Directory => copy_tree(source, destination),
        ObjectKind::Symlink => copy_symlink(source, destination),
        ObjectKind::File => copy_file(source, destination),
    };

    copied.map_err(|source_err| MoveError::CrossVolumeFallbackFailure {
        from: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source: source_err,
    })?;

    let removed = match kind {
        ObjectKind::Directory => fs::remove_dir_all(source),
        ObjectKind::Symlink | ObjectKind::File => fs::remove_file(source),
    };

    removed.map_err(|e| MoveError::SourceNotRemoved {
        path: source.to_path_buf(),
        destination: destination.to_path_buf(),
        source: e,
    })
}

/// Recreate the tree at `source` under `destination`.
///
/// Directories are created writable and get their real mode once their
/// contents are in place, deepest first, so read-only directories can
/// still be populated.
fn copy_tree(source: &Path, destination: &Path) -> io::Result<()> {
    let mut dir_modes = Vec::new();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else if file_type.is_dir() {
            let mode = entry.metadata()?.permissions().mode() & 0o7777;
            fs::DirBuilder::new().mode(0o700).create(&target)?;
            dir_modes.push((target, mode));
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    for (dir, mode) in dir_modes.into_iter().rev() {
        fs::set_permissions(&dir, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

/// Recreate a symlink with the same literal target, without resolving it.
fn copy_symlink(source: &Path, destination: &Path) -> io::Result<()> {
    let target = fs::read_link(source)?;
    symlink(target, destination)
}

/// Copy bytes and permission bits of a regular file.
fn copy_file(source: &Path, destination: &Path) -> io::Result<()> {
    let metadata = fs::symlink_metadata(source)?;
    if !metadata.file_type().is_file() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("{} is not a regular file and cannot be copied", source.display()),
        ));
    }

    // fs::copy also carries the permission bits over
    fs::copy(source, destination)?;
    Ok(())
}
