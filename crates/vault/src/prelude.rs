//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types from the crate and its
//! immediate dependencies.

pub use crate::event_log::EventLog;
pub use crate::reentrancy::{OperationLock, OperationPermit};
pub use crate::vault::RangeVault;

pub use range_vault_domain::{
    AccountId, ConfigurationError, GuardConfig, PositionId, ProtocolError, SpotPrice, StateError,
    TickRange, TokenAmounts, TokenId, ValidationError, VaultError,
    events::{EventData, VaultEvent, VaultEventKind},
};
pub use range_vault_protocols::{
    Clock, DeployCaps, ExitOutcome, LiquidityAdapter, OpenOutcome, RangeAdapter, RebalanceOutcome,
    SwapRouter, TokenLedger, VariantRules,
};
