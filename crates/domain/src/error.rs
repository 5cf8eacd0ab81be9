//! Error taxonomy for the vault core.
//!
//! Every distinguishable failure mode surfaces as its own variant so that
//! callers can branch on cause: validation failures are retryable after
//! adjusting parameters, authorization and configuration failures are not,
//! and external-service failures propagate unchanged.

use crate::ids::{AccountId, PositionId, TokenId};
use thiserror::Error;

/// Failures of the fixed-point tick/price math library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Tick outside the protocol-defined valid range.
    #[error("tick {0} is outside the supported range")]
    TickOutOfRange(i32),
    /// Sqrt-price bounds were not ordered `lower < upper`.
    #[error("sqrt price bounds must satisfy lower < upper")]
    InvalidRange,
    /// An intermediate or final result does not fit its target width.
    #[error("result exceeds the target integer width")]
    Overflow,
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Wiring failures: the vault is not (or is already) configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The write-once adapter reference was already set.
    #[error("adapter is already set")]
    AdapterAlreadySet,
    /// No adapter has been set yet.
    #[error("adapter is not set")]
    AdapterNotSet,
    /// Guard configuration is degenerate.
    #[error("invalid guard configuration: {0}")]
    InvalidGuardConfig(String),
}

/// The operation is incompatible with the vault's current lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A position is already open for this vault.
    #[error("a position is already open")]
    PositionAlreadyOpen,
    /// No position is currently open.
    #[error("no position is open")]
    NoPosition,
    /// A guarded operation re-entered while another is still running.
    #[error("another operation is in progress on this vault")]
    OperationInProgress,
}

/// A guard check rejected the requested parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Range bounds were not ordered `lower < upper`.
    #[error("range bounds must satisfy lower < upper, got [{lower}, {upper}]")]
    InvalidRange { lower: i32, upper: i32 },
    /// Range narrower than the configured minimum.
    #[error("range width {width} is below the minimum of {min} ticks")]
    WidthBelowMinimum { width: i32, min: i32 },
    /// Range wider than the configured maximum.
    #[error("range width {width} is above the maximum of {max} ticks")]
    WidthAboveMaximum { width: i32, max: i32 },
    /// A bound is not an exact multiple of the pool's tick spacing.
    #[error("tick {tick} is not a multiple of the pool spacing {spacing}")]
    UnalignedTick { tick: i32, spacing: i32 },
    /// The rebalance cooldown has not elapsed.
    #[error("cooldown active: {remaining}s of {min_cooldown}s remaining")]
    CooldownActive { remaining: u64, min_cooldown: u64 },
    /// Spot price deviates too far from the time-weighted average.
    #[error("spot tick {spot} deviates from TWAP tick {twap} by more than {max_deviation}")]
    TwapDeviationExceeded {
        spot: i32,
        twap: i32,
        max_deviation: u32,
    },
    /// An in-range mint would deploy only one of the two assets.
    #[error("in-range mint would be single-sided")]
    SingleSidedInRange,
    /// The position is staked and this variant refuses to unstake implicitly.
    #[error("position is staked; unstake before rebalancing")]
    PositionStaked,
    /// Neither asset has a positive deployable balance.
    #[error("no deployable balance in either asset")]
    NoDeployableFunds,
}

/// An external collaborator (pool, registry, ledger, router) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Oracle windows must be strictly positive.
    #[error("oracle window must be positive")]
    InvalidOracleWindow,
    /// The pool cannot supply an observation old enough to cover the window.
    #[error("pool history does not cover a {window}s window")]
    InsufficientObservationHistory { window: u64 },
    /// The registry does not know this handle.
    #[error("unknown position handle {0}")]
    UnknownPosition(PositionId),
    /// A transfer exceeded the available balance.
    #[error("insufficient balance of {token} in account {account}")]
    InsufficientBalance { token: TokenId, account: AccountId },
    /// A pull exceeded the granted allowance.
    #[error("insufficient allowance of {token} from {owner} to {spender}")]
    InsufficientAllowance {
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
    },
    /// Burn was attempted on a position that still holds value.
    #[error("position {0} still holds liquidity or owed amounts")]
    PositionNotEmpty(PositionId),
    /// The reward registry rejected a calling convention.
    #[error("reward registry rejected the call: {0}")]
    ClaimRejected(String),
    /// A collaborator rejected the call outright.
    #[error("{service} rejected the call: {reason}")]
    Rejected { service: String, reason: String },
    /// A math failure surfaced while servicing an external call.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Top-level error for every vault and adapter operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// The caller is not the vault owner.
    #[error("caller {0} is not the vault owner")]
    Unauthorized(AccountId),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An external service failed; the whole operation aborts unchanged.
    #[error("external service failure: {0}")]
    External(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinguishable() {
        let err: VaultError = ValidationError::CooldownActive {
            remaining: 10,
            min_cooldown: 60,
        }
        .into();
        assert!(matches!(
            err,
            VaultError::Validation(ValidationError::CooldownActive { .. })
        ));

        let err: VaultError = ProtocolError::InvalidOracleWindow.into();
        assert!(matches!(err, VaultError::External(_)));
    }

    #[test]
    fn test_display_carries_context() {
        let err = ValidationError::UnalignedTick {
            tick: 61,
            spacing: 60,
        };
        assert_eq!(
            err.to_string(),
            "tick 61 is not a multiple of the pool spacing 60"
        );
    }
}
