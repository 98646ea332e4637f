//! Command implementations.
//!
//! Each command writes to the `out` it is given rather than stdout, and
//! prompting commands read answers from `input`.

pub mod empty;
pub mod list;
pub mod mem;
pub mod reconcile;
pub mod restore;
pub mod toss;

pub use self::empty::execute_empty;
pub use self::list::execute_list;
pub use self::mem::execute_mem;
pub use self::reconcile::execute_reconcile;
pub use self::restore::execute_restore;
pub use self::toss::execute_toss;
