//! The adapter capability: one interface, one parameterized implementation.
//!
//! An adapter owns the lifecycle of one opaque position handle per vault
//! and performs the collect/remove/mint/stake sequencing against the
//! external protocol. The vault holds a single `Arc<dyn LiquidityAdapter>`
//! and never branches on the concrete protocol.

/// The parameterized adapter implementation.
pub mod range_adapter;
/// Per-protocol quirk tables.
pub mod variants;

pub use range_adapter::RangeAdapter;

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::{
    AccountId, GuardConfig, PositionId, ProtocolError, SpotPrice, TickRange, TokenAmounts, TokenId,
    VaultError,
};
use serde::{Deserialize, Serialize};

use crate::services::PositionInfo;

/// Optional per-asset caps on how much a rebalance may deploy.
///
/// A zero cap means "unlimited, bounded by availability".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DeployCaps {
    pub cap0: U256,
    pub cap1: U256,
}

impl DeployCaps {
    pub fn new(cap0: U256, cap1: U256) -> Self {
        Self { cap0, cap1 }
    }

    /// No caps: deploy whatever is available.
    pub fn unlimited() -> Self {
        Self::default()
    }

    fn effective(cap: U256) -> U256 {
        if cap.is_zero() { U256::max_value() } else { cap }
    }

    /// Cap for asset0, with zero widened to unlimited.
    pub fn effective0(&self) -> U256 {
        Self::effective(self.cap0)
    }

    /// Cap for asset1, with zero widened to unlimited.
    pub fn effective1(&self) -> U256 {
        Self::effective(self.cap1)
    }
}

/// Result of opening an initial position.
#[derive(Debug, Clone, Copy)]
pub struct OpenOutcome {
    /// Handle issued by the registry.
    pub position: PositionId,
    /// Liquidity minted.
    pub liquidity: u128,
    /// Amounts actually deployed.
    pub used: TokenAmounts,
    /// Amounts returned to the vault unused.
    pub leftover: TokenAmounts,
}

/// Result of a rebalance.
#[derive(Debug, Clone, Copy)]
pub struct RebalanceOutcome {
    /// Handle that was destroyed.
    pub old_position: PositionId,
    /// Handle of the recreated position.
    pub new_position: PositionId,
    /// Liquidity of the new position.
    pub liquidity: u128,
    /// Amounts deployed into the new position.
    pub used: TokenAmounts,
    /// Fees collected while tearing down the old position.
    pub fees: TokenAmounts,
}

/// Result of an exit.
#[derive(Debug, Clone, Copy)]
pub struct ExitOutcome {
    /// Handle that was destroyed.
    pub position: PositionId,
    /// Total amounts returned to the vault.
    pub returned: TokenAmounts,
}

/// Protocol-specific position lifecycle, scoped per vault.
///
/// One adapter instance serves many vaults; every operation takes the
/// calling vault's identity. State machine per (adapter, vault):
/// `NoPosition -> Open -> NoPosition` via open/exit, `Open -> Open` via
/// rebalance (the handle changes), with an orthogonal staked flag toggled
/// by stake/unstake.
#[async_trait]
pub trait LiquidityAdapter: Send + Sync {
    /// Ledger account the adapter holds transient custody in.
    fn account(&self) -> AccountId;

    /// Guardrail configuration the owning vault must enforce.
    fn guard_config(&self) -> &GuardConfig;

    /// The two pooled assets, in pool order.
    async fn tokens(&self) -> Result<(TokenId, TokenId), ProtocolError>;

    /// The pool's tick spacing.
    async fn tick_spacing(&self) -> Result<i32, ProtocolError>;

    /// Current pool price.
    async fn spot(&self) -> Result<SpotPrice, ProtocolError>;

    /// TWAP tick over the configured window.
    async fn twap_tick(&self) -> Result<i32, ProtocolError>;

    /// Handle of the vault's open position, if any.
    async fn current_position(&self, vault: AccountId) -> Option<PositionId>;

    /// Ledger time of the vault's last rebalance (or initial open).
    async fn last_rebalance_at(&self, vault: AccountId) -> Option<u64>;

    /// Whether the vault's position is staked with the reward registry.
    async fn is_staked(&self, vault: AccountId) -> bool;

    /// Registry view of the vault's position, if one is open.
    async fn position_info(
        &self,
        vault: AccountId,
    ) -> Result<Option<PositionInfo>, ProtocolError>;

    /// Opens the vault's initial position over `range`, deploying the
    /// vault's available balances. Fails when a position already exists or
    /// neither asset balance is positive.
    async fn open_initial_position(
        &self,
        vault: AccountId,
        range: TickRange,
    ) -> Result<OpenOutcome, VaultError>;

    /// Destroys the current position and recreates it over `range`,
    /// deploying up to `caps` per asset. Requires an existing position.
    async fn rebalance_with_caps(
        &self,
        vault: AccountId,
        range: TickRange,
        caps: DeployCaps,
    ) -> Result<RebalanceOutcome, VaultError>;

    /// Collects, withdraws and burns the position, returning all
    /// adapter-held balances to the vault. No-op when no position exists.
    async fn exit_position_to_vault(
        &self,
        vault: AccountId,
    ) -> Result<Option<ExitOutcome>, VaultError>;

    /// Collects accrued yield straight to the vault without touching
    /// liquidity. Returns zero amounts when no position exists.
    async fn collect_to_vault(&self, vault: AccountId) -> Result<TokenAmounts, VaultError>;

    /// Stakes the position with the reward registry. `None` when no
    /// registry is configured or the position is already staked.
    async fn stake_position(&self, vault: AccountId) -> Result<Option<PositionId>, VaultError>;

    /// Unstakes the position. `None` when no registry is configured or the
    /// position is not staked.
    async fn unstake_position(&self, vault: AccountId) -> Result<Option<PositionId>, VaultError>;

    /// Best-effort reward claim, forwarding to the vault. `None` when no
    /// registry is configured or every calling convention was rejected.
    async fn claim_rewards(&self, vault: AccountId) -> Result<Option<U256>, VaultError>;
}
