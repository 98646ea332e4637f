//! toss Domain Layer
//!
//! This crate holds the vocabulary shared by every other toss crate: the
//! [`Entry`] record describing one tossed object, the [`EntryId`] that names
//! it, and the [`Ledger`](traits::Ledger) trait that storage backends implement.
//!
//! ## Key Concepts
//!
//! - **Entry**: one object sitting in the holding area, plus where it came from
//! - **EntryId**: random 128-bit identifier, rendered as a UUIDv4 string
//! - **Bin name**: `<id>-<basename>`, the name an object carries inside the bin
//! - **Ledger**: durable, queryable record of live entries
//!
//! ## Architecture
//!
//! - Minimal dependencies (`uuid`, `chrono`)
//! - No filesystem or database access
//! - Infrastructure implementations live in `toss-store` and `toss-bin`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod traits;

// Re-exports for convenience
pub use entry::{sanitize_bin_name, Entry, EntryId};
pub use traits::Ledger;
