//! Traits presented by external collaborators.
//!
//! The core consumes these surfaces and nothing else: a pool that reports
//! prices and cumulative-tick observations, a registry that owns position
//! lifecycles, an optional reward registry, a token ledger, a pass-through
//! swap router and a clock. Live deployments bind them to a real protocol;
//! the simulation crate provides in-memory implementations.

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::{
    AccountId, PositionId, ProtocolError, SpotPrice, TickRange, TokenAmounts, TokenId,
};
use serde::{Deserialize, Serialize};

/// Source of ledger time, in seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Read surface of the underlying pool and its price oracle.
#[async_trait]
pub trait LiquidityPool: Send + Sync {
    /// Minimum tick granularity for valid position bounds.
    async fn tick_spacing(&self) -> Result<i32, ProtocolError>;

    /// Current sqrt price and tick.
    async fn slot0(&self) -> Result<SpotPrice, ProtocolError>;

    /// Cumulative-tick observations, one per requested age in seconds.
    ///
    /// Fails when the pool cannot supply an observation old enough for a
    /// requested age.
    async fn observe(&self, seconds_agos: &[u64]) -> Result<Vec<i64>, ProtocolError>;

    /// The two pooled assets, in pool order.
    async fn tokens(&self) -> Result<(TokenId, TokenId), ProtocolError>;

    /// Fee tier in hundredths of a basis point.
    async fn fee_tier(&self) -> Result<u32, ProtocolError>;
}

/// Parameters for minting a new position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MintParams {
    /// Range the position covers.
    pub range: TickRange,
    /// Maximum amounts the registry may draw from the payer.
    pub desired: TokenAmounts,
    /// Account the registry draws funds from.
    pub payer: AccountId,
    /// Ledger time after which the mint must be rejected.
    pub deadline: u64,
}

/// Result of a successful mint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Handle of the new position.
    pub handle: PositionId,
    /// Liquidity minted.
    pub liquidity: u128,
    /// Amounts actually drawn from the payer.
    pub used: TokenAmounts,
}

/// Registry view of a position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionInfo {
    /// Tick bounds.
    pub range: TickRange,
    /// Liquidity currently deployed.
    pub liquidity: u128,
    /// Accrued, uncollected amounts.
    pub owed: TokenAmounts,
}

/// Position lifecycle owned by the external protocol.
#[async_trait]
pub trait PositionRegistry: Send + Sync {
    /// Ledger account the registry pulls mint funds into. Payers grant it
    /// an allowance before minting.
    fn account(&self) -> AccountId;

    /// Mints a new position, drawing at most `desired` from the payer.
    async fn mint(&self, params: MintParams) -> Result<MintReceipt, ProtocolError>;

    /// Withdraws liquidity; the resulting amounts accrue as owed.
    async fn decrease_liquidity(
        &self,
        handle: PositionId,
        liquidity: u128,
    ) -> Result<TokenAmounts, ProtocolError>;

    /// Transfers all owed amounts to `recipient`.
    async fn collect(
        &self,
        handle: PositionId,
        recipient: AccountId,
    ) -> Result<TokenAmounts, ProtocolError>;

    /// Destroys an empty position. Fails while liquidity or owed amounts
    /// remain.
    async fn burn(&self, handle: PositionId) -> Result<(), ProtocolError>;

    /// Bounds, liquidity and owed amounts for a handle.
    async fn position_info(&self, handle: PositionId) -> Result<PositionInfo, ProtocolError>;
}

/// Optional external reward distribution registry.
#[async_trait]
pub trait RewardRegistry: Send + Sync {
    /// Stakes a position on behalf of `depositor`.
    async fn deposit(&self, handle: PositionId, depositor: AccountId) -> Result<(), ProtocolError>;

    /// Unstakes a position previously deposited by `depositor`.
    async fn withdraw(&self, handle: PositionId, depositor: AccountId)
    -> Result<(), ProtocolError>;

    /// Claims rewards addressed by position handle.
    async fn claim_by_position(
        &self,
        handle: PositionId,
        recipient: AccountId,
    ) -> Result<U256, ProtocolError>;

    /// Claims rewards addressed by depositor account.
    async fn claim_by_depositor(
        &self,
        depositor: AccountId,
        recipient: AccountId,
    ) -> Result<U256, ProtocolError>;
}

/// Standard fungible-token semantics over an external ledger.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn balance_of(&self, token: TokenId, account: AccountId) -> U256;

    /// Moves `amount` from `from` to `to`. The caller vouches for `from`.
    async fn transfer(
        &self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError>;

    /// Moves `amount` out of `owner` on the strength of an allowance
    /// granted to `spender`.
    async fn transfer_from(
        &self,
        token: TokenId,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError>;

    /// Sets the allowance from `owner` to `spender`.
    async fn approve(
        &self,
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError>;

    async fn allowance(&self, token: TokenId, owner: AccountId, spender: AccountId) -> U256;
}

/// Pass-through swap counterparty. The vault approves it for exactly the
/// input amount and forwards the call; no routing happens in the core.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    /// Ledger account the router pulls the input amount into.
    fn account(&self) -> AccountId;

    /// Swaps an exact input amount, crediting the payer with the output.
    /// Fails when the output would be below `min_amount_out`.
    async fn swap_exact_in(
        &self,
        token_in: TokenId,
        token_out: TokenId,
        amount_in: U256,
        min_amount_out: U256,
        payer: AccountId,
    ) -> Result<U256, ProtocolError>;
}
