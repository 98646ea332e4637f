//! toss Storage Layer
//!
//! Implements the [`Ledger`] trait on top of SQLite.
//!
//! # Architecture
//!
//! - A single `entries` table, one row per object in the holding area
//! - Timestamps stored as fixed-precision RFC 3339 text so `ORDER BY tossed_at`
//!   is chronological
//! - Bin names re-sanitized on every read
//!
//! # Examples
//!
//! ```no_run
//! use toss_store::SqliteLedger;
//!
//! let ledger = SqliteLedger::open_in_memory().unwrap();
//! // Ledger is now ready for entry operations
//! ```

#![warn(missing_docs)]

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use toss_domain::{sanitize_bin_name, Entry, EntryId, Ledger};

const SELECT_ENTRIES: &str =
    "SELECT id, original_path, bin_name, tossed_at, is_dir, size_bytes FROM entries";

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backing store could not be opened or its schema created
    #[error("Cannot initialize ledger at {path}: {source}")]
    LedgerInit {
        /// Ledger file that failed to open
        path: PathBuf,
        /// Underlying SQLite failure
        #[source]
        source: rusqlite::Error,
    },

    /// Filesystem error while preparing the ledger location
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being created
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// An entry with this id is already recorded
    #[error("Duplicate entry id: {0}")]
    DuplicateId(EntryId),

    /// A stored row could not be turned back into an entry
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of [`Ledger`]
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should open its own
/// SqliteLedger. Concurrent processes rely on SQLite's file locking only.
pub struct SqliteLedger {
    conn: Connection,
}

/// A row exactly as stored, before validation
struct RawEntry {
    id: String,
    original_path: String,
    bin_name: String,
    tossed_at: String,
    is_dir: i64,
    size_bytes: i64,
}

impl SqliteLedger {
    /// Open the ledger at `path`, creating the file and any missing parent
    /// directories.
    ///
    /// Opening an existing ledger is harmless: the schema uses
    /// `CREATE ... IF NOT EXISTS` and no rows are touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use toss_store::SqliteLedger;
    ///
    /// let ledger = SqliteLedger::open("/home/me/.toss/ledger").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).map_err(|source| StoreError::LedgerInit {
            path: path.to_path_buf(),
            source,
        })?;
        let ledger = Self { conn };
        ledger
            .initialize_schema()
            .map_err(|source| StoreError::LedgerInit {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "ledger opened");
        Ok(ledger)
    }

    /// Open a throwaway in-memory ledger (useful for testing)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::LedgerInit {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let ledger = Self { conn };
        ledger
            .initialize_schema()
            .map_err(|source| StoreError::LedgerInit {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Ok(ledger)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), rusqlite::Error> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)
    }

    /// Number of live entries
    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Serialize a timestamp so that string order matches time order
    fn timestamp_to_text(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn text_to_timestamp(text: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::InvalidData(format!("tossed_at '{}': {}", text, e)))
    }

    fn read_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
        Ok(RawEntry {
            id: row.get(0)?,
            original_path: row.get(1)?,
            bin_name: row.get(2)?,
            tossed_at: row.get(3)?,
            is_dir: row.get(4)?,
            size_bytes: row.get(5)?,
        })
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Entry>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let raws = stmt
            .query_map(params, Self::read_raw)?
            .collect::<Result<Vec<_>, _>>()?;

        raws.into_iter().map(entry_from_raw).collect()
    }
}

/// Validate a stored row. Bin names are cut down to their final component.
fn entry_from_raw(raw: RawEntry) -> Result<Entry, StoreError> {
    let id = EntryId::parse(&raw.id).map_err(StoreError::InvalidData)?;

    let bin_name = sanitize_bin_name(&raw.bin_name)
        .ok_or_else(|| {
            StoreError::InvalidData(format!("entry {} has unusable bin name '{}'", id, raw.bin_name))
        })?
        .to_string();
    if bin_name != raw.bin_name {
        tracing::warn!(%id, stored = %raw.bin_name, used = %bin_name, "bin name sanitized");
    }

    let size_bytes = u64::try_from(raw.size_bytes).map_err(|_| {
        StoreError::InvalidData(format!("entry {} has negative size {}", id, raw.size_bytes))
    })?;

    Ok(Entry {
        id,
        original_path: PathBuf::from(raw.original_path),
        bin_name,
        tossed_at: SqliteLedger::text_to_timestamp(&raw.tossed_at)?,
        is_dir: raw.is_dir != 0,
        size_bytes,
    })
}

impl Ledger for SqliteLedger {
    type Error = StoreError;

    fn append(&mut self, entry: &Entry) -> Result<(), Self::Error> {
        let id = entry.id.to_string();

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM entries WHERE id = ?1", params![&id], |_| Ok(true))
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::DuplicateId(entry.id));
        }

        let original_path = entry.original_path.to_str().ok_or_else(|| {
            StoreError::InvalidData(format!(
                "original path is not valid UTF-8: {}",
                entry.original_path.display()
            ))
        })?;
        let size_bytes = i64::try_from(entry.size_bytes).map_err(|_| {
            StoreError::InvalidData(format!("size {} does not fit the ledger", entry.size_bytes))
        })?;

        self.conn.execute(
            "INSERT INTO entries (id, original_path, bin_name, tossed_at, is_dir, size_bytes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &id,
                original_path,
                &entry.bin_name,
                Self::timestamp_to_text(&entry.tossed_at),
                entry.is_dir as i64,
                size_bytes,
            ],
        )?;

        Ok(())
    }

    fn remove(&mut self, id: EntryId) -> Result<(), Self::Error> {
        self.conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
        Ok(())
    }

    fn all(&self) -> Result<Vec<Entry>, Self::Error> {
        self.query_entries(&format!("{} ORDER BY tossed_at, rowid", SELECT_ENTRIES), [])
    }

    fn find_by_query(&self, text: &str) -> Result<Vec<Entry>, Self::Error> {
        // instr() is a literal substring test, so `%` and `_` in the query need no escaping
        let needle = text.to_ascii_lowercase();
        self.query_entries(
            &format!(
                "{} WHERE instr(LOWER(original_path), ?1) > 0 OR instr(LOWER(bin_name), ?1) > 0
                 ORDER BY tossed_at, rowid",
                SELECT_ENTRIES
            ),
            params![needle],
        )
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.conn.execute("DELETE FROM entries", [])?;
        Ok(())
    }
}
