//! Lifecycle events for vault state transitions.
//!
//! One event is emitted per observable transition so an off-chain observer
//! can reconstruct the vault's history without polling.

use crate::ids::{AccountId, PositionId, TokenId};
use crate::value_objects::amount::TokenAmounts;
use crate::value_objects::tick_range::TickRange;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of vault event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEventKind {
    /// The write-once adapter reference was set.
    AdapterSet,
    /// An initial position was opened.
    PositionOpened,
    /// The position was destroyed and recreated over a new range.
    Rebalanced,
    /// The position was exited back to the vault.
    Exited,
    /// Accrued fees were collected without touching liquidity.
    FeesCollected,
    /// The position was staked with the reward registry.
    Staked,
    /// The position was unstaked from the reward registry.
    Unstaked,
    /// Rewards were claimed.
    RewardsClaimed,
    /// A pass-through swap was executed.
    Swapped,
    /// Idle balances were swept to a recipient.
    Withdrawn,
}

/// A recorded vault event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub kind: VaultEventKind,
    /// Vault the event belongs to.
    pub vault: AccountId,
    /// Ledger time the event was recorded at, in seconds.
    pub at: u64,
    /// Event-specific data.
    pub data: EventData,
}

impl VaultEvent {
    /// Creates a new event record.
    pub fn new(kind: VaultEventKind, vault: AccountId, at: u64, data: EventData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            vault,
            at,
            data,
        }
    }
}

/// Event-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventData {
    AdapterSet {
        adapter: AccountId,
    },
    PositionOpened(PositionOpenedData),
    Rebalanced(RebalancedData),
    Exited(ExitedData),
    FeesCollected {
        position: PositionId,
        amounts: TokenAmounts,
    },
    Staked {
        position: PositionId,
    },
    Unstaked {
        position: PositionId,
    },
    RewardsClaimed {
        amount: U256,
    },
    Swapped(SwappedData),
    Withdrawn {
        to: AccountId,
        amounts: TokenAmounts,
    },
}

/// Data for a position-opened event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionOpenedData {
    /// Handle issued by the position registry.
    pub position: PositionId,
    /// Range the position covers.
    pub range: TickRange,
    /// Liquidity minted.
    pub liquidity: u128,
    /// Amounts actually deployed.
    pub used: TokenAmounts,
}

/// Data for a rebalanced event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebalancedData {
    /// Handle that was destroyed.
    pub old_position: PositionId,
    /// Handle of the recreated position.
    pub new_position: PositionId,
    /// New range.
    pub range: TickRange,
    /// Liquidity of the new position.
    pub liquidity: u128,
    /// Fees collected while tearing down the old position.
    pub fees: TokenAmounts,
}

/// Data for an exited event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitedData {
    /// Handle that was destroyed.
    pub position: PositionId,
    /// Amounts returned to the vault.
    pub returned: TokenAmounts,
}

/// Data for a pass-through swap event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwappedData {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: U256,
    pub amount_out: U256,
}
