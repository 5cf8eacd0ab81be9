//! The vault: custody, authorization and the guarded state machine.

use std::sync::Arc;

use primitive_types::U256;
use range_vault_domain::events::{
    EventData, ExitedData, PositionOpenedData, RebalancedData, SwappedData, VaultEvent,
    VaultEventKind,
};
use range_vault_domain::{
    AccountId, ConfigurationError, PositionId, SpotPrice, StateError, TickRange, TokenAmounts,
    TokenId, VaultError,
};
use range_vault_protocols::{Clock, DeployCaps, LiquidityAdapter, SwapRouter, TokenLedger};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::event_log::EventLog;
use crate::guards;
use crate::reentrancy::OperationLock;

/// A single-owner vault managing one concentrated-liquidity position
/// through a write-once adapter.
///
/// All custody rests in the vault's ledger account. For the duration of a
/// single operation the adapter is granted an exact allowance, which is
/// zeroed again before the operation returns — never a standing right.
pub struct RangeVault {
    /// Ledger account the vault custodies assets in.
    id: AccountId,
    /// Identity with exclusive administrative rights; fixed at creation.
    owner: AccountId,
    ledger: Arc<dyn TokenLedger>,
    clock: Arc<dyn Clock>,
    /// Write-once adapter reference.
    adapter: RwLock<Option<Arc<dyn LiquidityAdapter>>>,
    /// Re-entrancy lock held across every mutating operation.
    op_lock: OperationLock,
    events: EventLog,
}

impl RangeVault {
    /// Creates a vault owned by `owner`. The adapter is wired separately,
    /// exactly once.
    pub fn new(owner: AccountId, ledger: Arc<dyn TokenLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            id: AccountId::new_unique(),
            owner,
            ledger,
            clock,
            adapter: RwLock::new(None),
            op_lock: OperationLock::new(),
            events: EventLog::new(),
        }
    }

    /// Ledger account of the vault. Depositors transfer funds here.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The vault owner.
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    fn require_owner(&self, caller: AccountId) -> Result<(), VaultError> {
        if caller != self.owner {
            return Err(VaultError::Unauthorized(caller));
        }
        Ok(())
    }

    async fn adapter(&self) -> Result<Arc<dyn LiquidityAdapter>, VaultError> {
        self.adapter
            .read()
            .await
            .clone()
            .ok_or_else(|| ConfigurationError::AdapterNotSet.into())
    }

    async fn record(&self, kind: VaultEventKind, data: EventData) {
        self.events
            .record(VaultEvent::new(kind, self.id, self.clock.now(), data))
            .await;
    }

    /// Grants the adapter an allowance equal to the vault's full balance
    /// of both pooled assets, returning the token pair for the later
    /// revoke.
    async fn grant_allowances(
        &self,
        adapter: &Arc<dyn LiquidityAdapter>,
    ) -> Result<(TokenId, TokenId), VaultError> {
        let (token0, token1) = adapter.tokens().await?;
        let spender = adapter.account();

        let balance0 = self.ledger.balance_of(token0, self.id).await;
        self.ledger
            .approve(token0, self.id, spender, balance0)
            .await?;
        let balance1 = self.ledger.balance_of(token1, self.id).await;
        self.ledger
            .approve(token1, self.id, spender, balance1)
            .await?;

        Ok((token0, token1))
    }

    async fn revoke_allowances(
        &self,
        adapter: &Arc<dyn LiquidityAdapter>,
        tokens: (TokenId, TokenId),
    ) -> Result<(), VaultError> {
        let spender = adapter.account();
        self.ledger
            .approve(tokens.0, self.id, spender, U256::zero())
            .await?;
        self.ledger
            .approve(tokens.1, self.id, spender, U256::zero())
            .await?;
        Ok(())
    }

    // ---------- mutating operations ----------

    /// Sets the adapter reference. May succeed exactly once per vault.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn set_adapter_once(
        &self,
        caller: AccountId,
        adapter: Arc<dyn LiquidityAdapter>,
    ) -> Result<(), VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;

        adapter.guard_config().validate()?;

        let mut slot = self.adapter.write().await;
        if slot.is_some() {
            return Err(ConfigurationError::AdapterAlreadySet.into());
        }
        let adapter_account = adapter.account();
        *slot = Some(adapter);
        drop(slot);

        self.record(
            VaultEventKind::AdapterSet,
            EventData::AdapterSet {
                adapter: adapter_account,
            },
        )
        .await;
        Ok(())
    }

    /// Opens the vault's initial position over `[lower, upper)`.
    #[instrument(skip(self), fields(vault = %self.id))]
    pub async fn open_initial_position(
        &self,
        caller: AccountId,
        lower: i32,
        upper: i32,
    ) -> Result<(PositionId, u128), VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        let range = TickRange::new(lower, upper)?;
        if adapter.current_position(self.id).await.is_some() {
            return Err(StateError::PositionAlreadyOpen.into());
        }
        guards::check_width(&range, adapter.guard_config())?;
        guards::check_alignment(&range, adapter.tick_spacing().await?)?;

        let tokens = self.grant_allowances(&adapter).await?;
        let result = adapter.open_initial_position(self.id, range).await;
        self.revoke_allowances(&adapter, tokens).await?;
        let outcome = result?;

        self.record(
            VaultEventKind::PositionOpened,
            EventData::PositionOpened(PositionOpenedData {
                position: outcome.position,
                range,
                liquidity: outcome.liquidity,
                used: outcome.used,
            }),
        )
        .await;
        Ok((outcome.position, outcome.liquidity))
    }

    /// Destroys the current position and recreates it over `[lower,
    /// upper)`, deploying at most `cap0`/`cap1` of each asset (zero means
    /// unlimited).
    #[instrument(skip(self), fields(vault = %self.id))]
    pub async fn rebalance_with_caps(
        &self,
        caller: AccountId,
        lower: i32,
        upper: i32,
        cap0: U256,
        cap1: U256,
    ) -> Result<u128, VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        let range = TickRange::new(lower, upper)?;
        if adapter.current_position(self.id).await.is_none() {
            return Err(StateError::NoPosition.into());
        }

        let config = adapter.guard_config();
        guards::check_cooldown(
            adapter.last_rebalance_at(self.id).await,
            self.clock.now(),
            config.min_cooldown_secs,
        )?;
        guards::check_width(&range, config)?;
        guards::check_alignment(&range, adapter.tick_spacing().await?)?;

        let spot = adapter.spot().await?;
        let twap = adapter.twap_tick().await?;
        guards::check_deviation(spot.tick, twap, config.max_twap_deviation_ticks)?;

        let tokens = self.grant_allowances(&adapter).await?;
        let result = adapter
            .rebalance_with_caps(self.id, range, DeployCaps::new(cap0, cap1))
            .await;
        self.revoke_allowances(&adapter, tokens).await?;
        let outcome = result?;

        self.record(
            VaultEventKind::Rebalanced,
            EventData::Rebalanced(RebalancedData {
                old_position: outcome.old_position,
                new_position: outcome.new_position,
                range,
                liquidity: outcome.liquidity,
                fees: outcome.fees,
            }),
        )
        .await;
        Ok(outcome.liquidity)
    }

    /// Exits the position, returning all funds to the vault. No-op when no
    /// position is open.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn exit_position_to_vault(&self, caller: AccountId) -> Result<(), VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        self.exit_locked(&adapter).await
    }

    /// Exit body, shared with the withdraw-all path; assumes the permit is
    /// already held.
    async fn exit_locked(&self, adapter: &Arc<dyn LiquidityAdapter>) -> Result<(), VaultError> {
        if let Some(outcome) = adapter.exit_position_to_vault(self.id).await? {
            self.record(
                VaultEventKind::Exited,
                EventData::Exited(ExitedData {
                    position: outcome.position,
                    returned: outcome.returned,
                }),
            )
            .await;
        }
        Ok(())
    }

    /// Exits the position, then sweeps every vault-held balance of both
    /// assets to `to`.
    #[instrument(skip(self), fields(vault = %self.id))]
    pub async fn exit_position_and_withdraw_all(
        &self,
        caller: AccountId,
        to: AccountId,
    ) -> Result<TokenAmounts, VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        self.exit_locked(&adapter).await?;

        let (token0, token1) = adapter.tokens().await?;
        let mut swept = TokenAmounts::zero();
        let balance0 = self.ledger.balance_of(token0, self.id).await;
        if !balance0.is_zero() {
            self.ledger.transfer(token0, self.id, to, balance0).await?;
            swept.amount0 = balance0;
        }
        let balance1 = self.ledger.balance_of(token1, self.id).await;
        if !balance1.is_zero() {
            self.ledger.transfer(token1, self.id, to, balance1).await?;
            swept.amount1 = balance1;
        }

        self.record(
            VaultEventKind::Withdrawn,
            EventData::Withdrawn { to, amounts: swept },
        )
        .await;
        Ok(swept)
    }

    /// Collects accrued fees into the vault without touching liquidity.
    /// Returns zero amounts when no position is open.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn collect_to_vault(&self, caller: AccountId) -> Result<TokenAmounts, VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        let Some(position) = adapter.current_position(self.id).await else {
            return Ok(TokenAmounts::zero());
        };

        let amounts = adapter.collect_to_vault(self.id).await?;
        self.record(
            VaultEventKind::FeesCollected,
            EventData::FeesCollected { position, amounts },
        )
        .await;
        Ok(amounts)
    }

    /// Stakes the position with the adapter's reward registry.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn stake(&self, caller: AccountId) -> Result<(), VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        if let Some(position) = adapter.stake_position(self.id).await? {
            self.record(VaultEventKind::Staked, EventData::Staked { position })
                .await;
        }
        Ok(())
    }

    /// Unstakes the position.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn unstake(&self, caller: AccountId) -> Result<(), VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        if let Some(position) = adapter.unstake_position(self.id).await? {
            self.record(VaultEventKind::Unstaked, EventData::Unstaked { position })
                .await;
        }
        Ok(())
    }

    /// Best-effort reward claim. Succeeds even when no convention against
    /// the reward registry is accepted.
    #[instrument(skip_all, fields(vault = %self.id))]
    pub async fn claim_rewards(&self, caller: AccountId) -> Result<Option<U256>, VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;
        let adapter = self.adapter().await?;

        let claimed = adapter.claim_rewards(self.id).await?;
        if let Some(amount) = claimed {
            self.record(
                VaultEventKind::RewardsClaimed,
                EventData::RewardsClaimed { amount },
            )
            .await;
        }
        Ok(claimed)
    }

    /// Pass-through swap of an exact input amount against an external
    /// router. The router is approved for exactly `amount_in`.
    #[instrument(skip(self, router), fields(vault = %self.id))]
    pub async fn swap_exact_in(
        &self,
        caller: AccountId,
        router: Arc<dyn SwapRouter>,
        token_in: TokenId,
        token_out: TokenId,
        amount_in: U256,
        min_amount_out: U256,
    ) -> Result<U256, VaultError> {
        self.require_owner(caller)?;
        let _permit = self.op_lock.enter()?;

        self.ledger
            .approve(token_in, self.id, router.account(), amount_in)
            .await?;
        let result = router
            .swap_exact_in(token_in, token_out, amount_in, min_amount_out, self.id)
            .await;
        self.ledger
            .approve(token_in, self.id, router.account(), U256::zero())
            .await?;
        let amount_out = result?;

        self.record(
            VaultEventKind::Swapped,
            EventData::Swapped(SwappedData {
                token_in,
                token_out,
                amount_in,
                amount_out,
            }),
        )
        .await;
        Ok(amount_out)
    }

    // ---------- read-only surface ----------

    /// Ledger account of the configured adapter, if set.
    pub async fn adapter_account(&self) -> Option<AccountId> {
        self.adapter
            .read()
            .await
            .as_ref()
            .map(|adapter| adapter.account())
    }

    /// Handle of the open position, if any.
    pub async fn position_id(&self) -> Result<Option<PositionId>, VaultError> {
        Ok(self.adapter().await?.current_position(self.id).await)
    }

    /// The pool's tick spacing.
    pub async fn tick_spacing(&self) -> Result<i32, VaultError> {
        Ok(self.adapter().await?.tick_spacing().await?)
    }

    /// Current pool price.
    pub async fn current_spot_price(&self) -> Result<SpotPrice, VaultError> {
        Ok(self.adapter().await?.spot().await?)
    }

    /// Bounds and liquidity of the open position. Fails when no position
    /// is open.
    pub async fn current_range(&self) -> Result<(TickRange, u128), VaultError> {
        let info = self
            .adapter()
            .await?
            .position_info(self.id)
            .await?
            .ok_or(StateError::NoPosition)?;
        Ok((info.range, info.liquidity))
    }

    /// The two pooled assets.
    pub async fn tokens(&self) -> Result<(TokenId, TokenId), VaultError> {
        Ok(self.adapter().await?.tokens().await?)
    }

    /// Snapshot of the recorded lifecycle events.
    pub async fn events(&self) -> Vec<VaultEvent> {
        self.events.snapshot().await
    }
}
