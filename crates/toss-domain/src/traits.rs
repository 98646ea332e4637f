//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Entry, EntryId};

/// Trait for recording and querying tossed objects
///
/// Implemented by the infrastructure layer (toss-store). Any embedded store
/// can satisfy it as long as it keeps the `entries` table contract: one row
/// per live entry, keyed by id.
pub trait Ledger {
    /// Error type for ledger operations
    type Error;

    /// Record a newly tossed object. Fails if the id is already present.
    fn append(&mut self, entry: &Entry) -> Result<(), Self::Error>;

    /// Forget an entry. Removing an unknown id is not an error.
    fn remove(&mut self, id: EntryId) -> Result<(), Self::Error>;

    /// Every live entry, oldest toss first
    fn all(&self) -> Result<Vec<Entry>, Self::Error>;

    /// Entries whose original path or bin name contains `text`, ignoring case,
    /// oldest toss first
    fn find_by_query(&self, text: &str) -> Result<Vec<Entry>, Self::Error>;

    /// Drop every entry
    fn clear(&mut self) -> Result<(), Self::Error>;
}
