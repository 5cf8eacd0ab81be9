//! The vault/position manager.
//!
//! This crate provides the guarded state machine at the center of the
//! workspace:
//! - Custody of the two pooled assets and owner-only mutations
//! - A write-once adapter reference
//! - Guard checks (cooldown, width, alignment, TWAP deviation) evaluated
//!   before any external call
//! - A per-vault re-entrancy lock held for the whole of every mutating
//!   operation
//! - An event log with one record per observable state transition

/// Prelude module for convenient imports.
pub mod prelude;

/// Event log for vault state transitions.
pub mod event_log;
/// Pure guard checks.
pub mod guards;
/// Per-vault operation lock.
pub mod reentrancy;
/// The vault itself.
pub mod vault;

pub use event_log::EventLog;
pub use reentrancy::{OperationLock, OperationPermit};
pub use vault::RangeVault;
