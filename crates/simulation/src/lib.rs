//! In-memory implementations of every external-service trait.
//!
//! Used by integration tests and local experiments:
//! - `MockClock` with explicit time control
//! - `InMemoryLedger` with balances and allowances
//! - `SimPool` with a cumulative-tick observation history
//! - `SimPositionRegistry` backed by the domain math
//! - `SimRewardRegistry` with configurable claim-convention rejection
//! - `SimRouter`, a fixed-rate swap counterparty
//! - Random tick-path generation for oracle scenarios

/// Controllable ledger clock.
pub mod clock;
/// Balances and allowances.
pub mod ledger;
/// Pool with observation history.
pub mod pool;
/// Random tick paths.
pub mod price_path;
/// Position registry.
pub mod registry;
/// Reward registry.
pub mod rewards;
/// Swap counterparty.
pub mod router;

pub use clock::MockClock;
pub use ledger::InMemoryLedger;
pub use pool::SimPool;
pub use price_path::{RandomTickWalk, TickPathGenerator};
pub use registry::SimPositionRegistry;
pub use rewards::SimRewardRegistry;
pub use router::SimRouter;
