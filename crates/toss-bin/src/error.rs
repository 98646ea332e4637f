//! Error types for holding-area operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use toss_domain::EntryId;

/// Boxed ledger failure, kept opaque so any [`Ledger`](toss_domain::Ledger) backend fits
pub type LedgerFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for holding-area operations.
pub type Result<T> = std::result::Result<T, BinError>;

/// Errors raised while relocating a filesystem object
#[derive(Error, Debug)]
pub enum MoveError {
    /// Nothing exists at the path (broken symlinks do exist)
    #[error("{0}: no such file or directory")]
    NotFound(PathBuf),

    /// The filesystem refused access
    #[error("{path}: permission denied")]
    PermissionDenied {
        /// Path that could not be accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Restore target is already occupied; nothing was overwritten
    #[error("{0}: destination already exists")]
    DestinationExists(PathBuf),

    /// Path has no final component to name the object after
    #[error("{0}: path has no file name")]
    InvalidSource(PathBuf),

    /// Cross-device copy stopped part way. The source is intact; whatever
    /// exists at `destination` is incomplete and must be discarded.
    #[error("copy from {from} to {destination} failed, source left intact: {source}")]
    CrossVolumeFallbackFailure {
        /// Object being copied
        from: PathBuf,
        /// Possibly partial copy
        destination: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Cross-device copy completed but the original could not be deleted.
    /// `destination` holds a complete copy.
    #[error("copied {path} to {destination} but could not remove the original: {source}")]
    SourceNotRemoved {
        /// Original object, possibly partly deleted
        path: PathBuf,
        /// Complete copy
        destination: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// Classify an I/O failure on `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path, source },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors surfaced by [`HoldingArea`](crate::HoldingArea)
#[derive(Error, Debug)]
pub enum BinError {
    /// The object could not be moved; nothing was recorded or forgotten
    #[error(transparent)]
    Move(#[from] MoveError),

    /// The ledger could not be opened, read or written
    #[error("Ledger error: {0}")]
    Ledger(#[source] LedgerFailure),

    /// The object reached the bin but its record could not be written
    #[error("{bin_path} is in the bin but untracked (tossed from {original_path}): {source}")]
    OrphanedObject {
        /// Where the object now lives
        bin_path: PathBuf,
        /// Where it came from
        original_path: PathBuf,
        /// Ledger failure
        #[source]
        source: LedgerFailure,
    },

    /// The object was restored but its record could not be removed
    #[error("{original_path} was restored but entry {id} is still recorded: {source}")]
    StaleRecord {
        /// Entry that should have been removed
        id: EntryId,
        /// Where the object was restored to
        original_path: PathBuf,
        /// Ledger failure
        #[source]
        source: LedgerFailure,
    },

    /// The path is the bin itself, lives inside it, or contains it
    #[error("refusing to toss {0}: it is part of the bin")]
    Refused(PathBuf),

    /// Filesystem error on the bin directory itself
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl BinError {
    pub(crate) fn ledger<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Ledger(Box::new(error))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
