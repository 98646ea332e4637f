//! toss holding-area engine
//!
//! Moves filesystem objects into a managed bin instead of deleting them,
//! records where they came from, and puts them back on request.
//!
//! The engine is made of two pieces glued together by [`HoldingArea`]:
//!
//! - [`ObjectMover`] relocates files, directory trees and symlinks, trying an
//!   atomic rename first and copying across devices when it has to.
//! - A [`Ledger`](toss_domain::Ledger) (by default [`SqliteLedger`]) remembers
//!   every object currently in the bin.
//!
//! Moving and recording are two separate steps with no shared transaction.
//! When the second step fails the engine reports it ([`BinError::OrphanedObject`],
//! [`BinError::StaleRecord`]) and leaves repair to [`HoldingArea::reconcile`]
//! or to the user.
//!
//! # Examples
//!
//! ```no_run
//! use toss_bin::{BinPaths, HoldingArea};
//!
//! # fn main() -> toss_bin::Result<()> {
//! let mut bin = HoldingArea::open(BinPaths::under("/home/me/.toss"))?;
//! let entry = bin.toss("old-notes.txt")?;
//! bin.restore(&entry)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod holding;
pub mod mover;
pub mod paths;
pub mod reconcile;

pub use error::{BinError, MoveError, Result};
pub use holding::{BatchReport, HoldingArea};
pub use mover::{Moved, ObjectKind, ObjectMover};
pub use paths::BinPaths;
pub use reconcile::ReconcileReport;
pub use toss_store::SqliteLedger;
