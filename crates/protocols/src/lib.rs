//! External-protocol surface of the range-vault workspace.
//!
//! This crate defines:
//! - The traits an underlying liquidity protocol presents to the core
//!   (pool, position registry, reward registry, token ledger, swap router,
//!   clock)
//! - The TWAP oracle helper
//! - The `LiquidityAdapter` capability and its single parameterized
//!   implementation, `RangeAdapter`, configured per protocol variant

/// The adapter capability and its parameterized implementation.
pub mod adapter;
/// Time-weighted average tick over a trailing window.
pub mod oracle;
/// Traits presented by external collaborators.
pub mod services;

pub use adapter::{
    DeployCaps, ExitOutcome, LiquidityAdapter, OpenOutcome, RangeAdapter, RebalanceOutcome,
};
pub use adapter::variants::{ClaimConvention, VariantRules};
pub use oracle::TwapOracle;
pub use services::{
    Clock, LiquidityPool, MintParams, MintReceipt, PositionInfo, PositionRegistry, RewardRegistry,
    SwapRouter, TokenLedger,
};
