//! Entry module - the record kept for every object in the holding area

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

/// Unique identifier for an entry based on a random UUIDv4
///
/// UUIDv4 provides:
/// - 122 bits of randomness from the OS CSPRNG
/// - The familiar `8-4-4-4-12` hex rendering
/// - No coordination required between toss invocations
///
/// Generation never degrades to a weak or zeroed value: if the OS random
/// source is unavailable, `uuid` panics instead of returning an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Generate a new random EntryId
    ///
    /// # Examples
    ///
    /// ```
    /// use toss_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// assert_eq!(id.to_string().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().as_u128())
    }

    /// Create an EntryId from a raw u128 value
    ///
    /// This is primarily for tests and storage round-trips.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntryId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use toss_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// let parsed = EntryId::parse(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid entry id '{}': {}", s, e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0).hyphenated())
    }
}

/// Reduce a stored bin name to its final path component.
///
/// Bin names read back from the ledger are untrusted: a corrupted or
/// hand-edited record could hold `../../etc/passwd`. Only the last component
/// is ever joined onto the holding-area directory. Returns `None` when no
/// usable component remains (empty string, `..`, `/`).
///
/// ```
/// use toss_domain::sanitize_bin_name;
///
/// assert_eq!(sanitize_bin_name("../../etc/passwd"), Some("passwd"));
/// assert_eq!(sanitize_bin_name(".."), None);
/// ```
pub fn sanitize_bin_name(raw: &str) -> Option<&str> {
    Path::new(raw).file_name().and_then(|name| name.to_str())
}

/// An object that currently lives in the holding area
///
/// Entries are immutable once created. They are written when an object is
/// tossed and deleted when it is restored or the bin is emptied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unique identifier, primary key in the ledger
    pub id: EntryId,

    /// Absolute path the object occupied before it was tossed
    pub original_path: PathBuf,

    /// Name inside the holding area, always `<id>-<basename>`
    pub bin_name: String,

    /// When the object was moved into the bin
    pub tossed_at: DateTime<Utc>,

    /// Whether the object was a directory at toss time
    pub is_dir: bool,

    /// Size in bytes at toss time (recursive for directories)
    pub size_bytes: u64,
}

impl Entry {
    /// Build an entry for an object about to be tossed.
    ///
    /// The bin name is derived from the id and the basename of
    /// `original_path`. Returns `None` when the path has no final component
    /// that is valid UTF-8.
    pub fn new(
        id: EntryId,
        original_path: PathBuf,
        tossed_at: DateTime<Utc>,
        is_dir: bool,
        size_bytes: u64,
    ) -> Option<Self> {
        let bin_name = Self::bin_name_for(id, &original_path)?;
        Some(Self {
            id,
            original_path,
            bin_name,
            tossed_at,
            is_dir,
            size_bytes,
        })
    }

    /// The name an object at `original_path` gets inside the bin.
    pub fn bin_name_for(id: EntryId, original_path: &Path) -> Option<String> {
        let base = original_path.file_name()?.to_str()?;
        Some(format!("{}-{}", id, base))
    }
}
