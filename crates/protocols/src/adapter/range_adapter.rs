//! Parameterized adapter over a generic concentrated-liquidity protocol.
//!
//! One `RangeAdapter` instance serves many vaults; per-vault state is
//! keyed by vault identity and never leaks across tenants. Protocol
//! differences are confined to the `VariantRules` quirk table.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::{
    AccountId, GuardConfig, PositionId, ProtocolError, SpotPrice, StateError, TickRange,
    TokenAmounts, TokenId, ValidationError, VaultError,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::adapter::variants::{ClaimConvention, VariantRules};
use crate::adapter::{DeployCaps, ExitOutcome, LiquidityAdapter, OpenOutcome, RebalanceOutcome};
use crate::oracle::TwapOracle;
use crate::services::{
    Clock, LiquidityPool, MintParams, MintReceipt, PositionInfo, PositionRegistry, RewardRegistry,
    TokenLedger,
};

/// Slack added to the ledger clock for mint deadlines. A protocol-level
/// safety bound against stale execution, not a cancellation mechanism.
const DEADLINE_SLACK_SECS: u64 = 600;

/// Per-vault record inside a shared adapter instance.
#[derive(Debug, Clone, Copy, Default)]
struct VaultBook {
    position: Option<PositionId>,
    last_rebalance_at: Option<u64>,
    staked: bool,
}

/// Adapter for one pool of one underlying protocol.
pub struct RangeAdapter {
    /// Ledger account holding transient custody during an operation.
    account: AccountId,
    pool: Arc<dyn LiquidityPool>,
    positions: Arc<dyn PositionRegistry>,
    rewards: Option<Arc<dyn RewardRegistry>>,
    ledger: Arc<dyn TokenLedger>,
    clock: Arc<dyn Clock>,
    guards: GuardConfig,
    rules: VariantRules,
    books: RwLock<HashMap<AccountId, VaultBook>>,
}

impl RangeAdapter {
    /// Wires an adapter for a plain v3-style pool without rewards.
    pub fn uniswap_v3(
        pool: Arc<dyn LiquidityPool>,
        positions: Arc<dyn PositionRegistry>,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn Clock>,
        guards: GuardConfig,
    ) -> Result<Arc<Self>, VaultError> {
        Self::new(VariantRules::uniswap_v3(), pool, positions, None, ledger, clock, guards)
    }

    /// Wires an adapter for a Slipstream-style pool with gauge staking.
    pub fn slipstream(
        pool: Arc<dyn LiquidityPool>,
        positions: Arc<dyn PositionRegistry>,
        rewards: Arc<dyn RewardRegistry>,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn Clock>,
        guards: GuardConfig,
    ) -> Result<Arc<Self>, VaultError> {
        Self::new(
            VariantRules::slipstream(),
            pool,
            positions,
            Some(rewards),
            ledger,
            clock,
            guards,
        )
    }

    /// Wires an adapter for a Pancake-style pool with farm staking.
    pub fn pancake_v3(
        pool: Arc<dyn LiquidityPool>,
        positions: Arc<dyn PositionRegistry>,
        rewards: Arc<dyn RewardRegistry>,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn Clock>,
        guards: GuardConfig,
    ) -> Result<Arc<Self>, VaultError> {
        Self::new(
            VariantRules::pancake_v3(),
            pool,
            positions,
            Some(rewards),
            ledger,
            clock,
            guards,
        )
    }

    /// Wires an adapter with explicit rules.
    pub fn new(
        rules: VariantRules,
        pool: Arc<dyn LiquidityPool>,
        positions: Arc<dyn PositionRegistry>,
        rewards: Option<Arc<dyn RewardRegistry>>,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn Clock>,
        guards: GuardConfig,
    ) -> Result<Arc<Self>, VaultError> {
        guards.validate()?;
        Ok(Arc::new(Self {
            account: AccountId::new_unique(),
            pool,
            positions,
            rewards,
            ledger,
            clock,
            guards,
            rules,
            books: RwLock::new(HashMap::new()),
        }))
    }

    async fn book(&self, vault: AccountId) -> VaultBook {
        self.books.read().await.get(&vault).copied().unwrap_or_default()
    }

    async fn store_book(&self, vault: AccountId, book: VaultBook) {
        self.books.write().await.insert(vault, book);
    }

    /// Computes deployable amounts, pulls the vault-side shortfall into
    /// adapter custody and mints over `range`.
    ///
    /// Usable amount per asset is `min(cap, adapter balance + vault
    /// balance)`; the pull is limited to what the mint may actually use.
    async fn pull_and_mint(
        &self,
        vault: AccountId,
        range: TickRange,
        caps: DeployCaps,
    ) -> Result<MintReceipt, VaultError> {
        let (token0, token1) = self.pool.tokens().await?;

        let held0 = self.ledger.balance_of(token0, self.account).await;
        let held1 = self.ledger.balance_of(token1, self.account).await;
        let vault0 = self.ledger.balance_of(token0, vault).await;
        let vault1 = self.ledger.balance_of(token1, vault).await;

        let usable0 = caps.effective0().min(held0.saturating_add(vault0));
        let usable1 = caps.effective1().min(held1.saturating_add(vault1));

        if usable0.is_zero() && usable1.is_zero() {
            return Err(ValidationError::NoDeployableFunds.into());
        }

        if self.rules.require_two_sided_in_range {
            let spot = self.pool.slot0().await?;
            if range.contains_tick(spot.tick) && (usable0.is_zero() || usable1.is_zero()) {
                return Err(ValidationError::SingleSidedInRange.into());
            }
        }

        let pull0 = usable0.saturating_sub(held0);
        if !pull0.is_zero() {
            self.ledger
                .transfer_from(token0, self.account, vault, self.account, pull0)
                .await?;
        }
        let pull1 = usable1.saturating_sub(held1);
        if !pull1.is_zero() {
            self.ledger
                .transfer_from(token1, self.account, vault, self.account, pull1)
                .await?;
        }

        let registry = self.positions.account();
        self.ledger
            .approve(token0, self.account, registry, usable0)
            .await?;
        self.ledger
            .approve(token1, self.account, registry, usable1)
            .await?;

        let receipt = self
            .positions
            .mint(MintParams {
                range,
                desired: TokenAmounts::new(usable0, usable1),
                payer: self.account,
                deadline: self.clock.now() + DEADLINE_SLACK_SECS,
            })
            .await?;

        self.ledger
            .approve(token0, self.account, registry, U256::zero())
            .await?;
        self.ledger
            .approve(token1, self.account, registry, U256::zero())
            .await?;

        debug!(
            variant = self.rules.name,
            %vault,
            handle = %receipt.handle,
            liquidity = receipt.liquidity,
            "minted position"
        );
        Ok(receipt)
    }

    /// Returns every adapter-held balance of the pool's assets to the vault.
    async fn refund_to_vault(&self, vault: AccountId) -> Result<TokenAmounts, VaultError> {
        let (token0, token1) = self.pool.tokens().await?;
        let mut refunded = TokenAmounts::zero();

        let held0 = self.ledger.balance_of(token0, self.account).await;
        if !held0.is_zero() {
            self.ledger
                .transfer(token0, self.account, vault, held0)
                .await?;
            refunded.amount0 = held0;
        }
        let held1 = self.ledger.balance_of(token1, self.account).await;
        if !held1.is_zero() {
            self.ledger
                .transfer(token1, self.account, vault, held1)
                .await?;
            refunded.amount1 = held1;
        }
        Ok(refunded)
    }

    /// Collects fees, withdraws all liquidity and burns the handle. The
    /// collected value lands in adapter custody; fees collected before the
    /// withdrawal are reported separately.
    async fn teardown(&self, handle: PositionId) -> Result<TokenAmounts, VaultError> {
        let fees = self.positions.collect(handle, self.account).await?;

        let info = self.positions.position_info(handle).await?;
        if info.liquidity > 0 {
            self.positions
                .decrease_liquidity(handle, info.liquidity)
                .await?;
            self.positions.collect(handle, self.account).await?;
        }

        self.positions.burn(handle).await?;
        debug!(%handle, fees0 = %fees.amount0, fees1 = %fees.amount1, "position torn down");
        Ok(fees)
    }

    /// Unstakes before a lifecycle mutation, honoring the variant quirk.
    /// Returns whether the position was staked.
    async fn unstake_for_mutation(
        &self,
        book: &VaultBook,
        handle: PositionId,
    ) -> Result<bool, VaultError> {
        if !book.staked {
            return Ok(false);
        }
        if self.rules.forbid_mutation_while_staked {
            return Err(ValidationError::PositionStaked.into());
        }
        if let Some(rewards) = &self.rewards {
            rewards.withdraw(handle, self.account).await?;
        }
        Ok(true)
    }
}

#[async_trait]
impl LiquidityAdapter for RangeAdapter {
    fn account(&self) -> AccountId {
        self.account
    }

    fn guard_config(&self) -> &GuardConfig {
        &self.guards
    }

    async fn tokens(&self) -> Result<(TokenId, TokenId), ProtocolError> {
        self.pool.tokens().await
    }

    async fn tick_spacing(&self) -> Result<i32, ProtocolError> {
        self.pool.tick_spacing().await
    }

    async fn spot(&self) -> Result<SpotPrice, ProtocolError> {
        self.pool.slot0().await
    }

    async fn twap_tick(&self) -> Result<i32, ProtocolError> {
        TwapOracle::consult_tick(self.pool.as_ref(), self.guards.twap_window_secs).await
    }

    async fn current_position(&self, vault: AccountId) -> Option<PositionId> {
        self.book(vault).await.position
    }

    async fn last_rebalance_at(&self, vault: AccountId) -> Option<u64> {
        self.book(vault).await.last_rebalance_at
    }

    async fn is_staked(&self, vault: AccountId) -> bool {
        self.book(vault).await.staked
    }

    async fn position_info(
        &self,
        vault: AccountId,
    ) -> Result<Option<PositionInfo>, ProtocolError> {
        match self.book(vault).await.position {
            Some(handle) => Ok(Some(self.positions.position_info(handle).await?)),
            None => Ok(None),
        }
    }

    async fn open_initial_position(
        &self,
        vault: AccountId,
        range: TickRange,
    ) -> Result<OpenOutcome, VaultError> {
        let mut book = self.book(vault).await;
        if book.position.is_some() {
            return Err(StateError::PositionAlreadyOpen.into());
        }

        let receipt = self
            .pull_and_mint(vault, range, DeployCaps::unlimited())
            .await?;
        let leftover = self.refund_to_vault(vault).await?;

        book.position = Some(receipt.handle);
        book.last_rebalance_at = Some(self.clock.now());
        book.staked = false;
        self.store_book(vault, book).await;

        info!(
            variant = self.rules.name,
            %vault,
            handle = %receipt.handle,
            range = %range,
            liquidity = receipt.liquidity,
            "opened initial position"
        );
        Ok(OpenOutcome {
            position: receipt.handle,
            liquidity: receipt.liquidity,
            used: receipt.used,
            leftover,
        })
    }

    async fn rebalance_with_caps(
        &self,
        vault: AccountId,
        range: TickRange,
        caps: DeployCaps,
    ) -> Result<RebalanceOutcome, VaultError> {
        let mut book = self.book(vault).await;
        let Some(old_handle) = book.position else {
            return Err(StateError::NoPosition.into());
        };

        let was_staked = self.unstake_for_mutation(&book, old_handle).await?;

        let fees = self.teardown(old_handle).await?;
        let receipt = self.pull_and_mint(vault, range, caps).await?;
        self.refund_to_vault(vault).await?;

        if was_staked
            && let Some(rewards) = &self.rewards
        {
            rewards.deposit(receipt.handle, self.account).await?;
        }

        book.position = Some(receipt.handle);
        book.last_rebalance_at = Some(self.clock.now());
        book.staked = was_staked;
        self.store_book(vault, book).await;

        info!(
            variant = self.rules.name,
            %vault,
            old_handle = %old_handle,
            new_handle = %receipt.handle,
            range = %range,
            liquidity = receipt.liquidity,
            "rebalanced position"
        );
        Ok(RebalanceOutcome {
            old_position: old_handle,
            new_position: receipt.handle,
            liquidity: receipt.liquidity,
            used: receipt.used,
            fees,
        })
    }

    async fn exit_position_to_vault(
        &self,
        vault: AccountId,
    ) -> Result<Option<ExitOutcome>, VaultError> {
        let mut book = self.book(vault).await;
        let Some(handle) = book.position else {
            return Ok(None);
        };

        self.unstake_for_mutation(&book, handle).await?;
        self.teardown(handle).await?;
        let returned = self.refund_to_vault(vault).await?;

        book.position = None;
        book.staked = false;
        self.store_book(vault, book).await;

        info!(
            variant = self.rules.name,
            %vault,
            %handle,
            returned0 = %returned.amount0,
            returned1 = %returned.amount1,
            "exited position to vault"
        );
        Ok(Some(ExitOutcome {
            position: handle,
            returned,
        }))
    }

    async fn collect_to_vault(&self, vault: AccountId) -> Result<TokenAmounts, VaultError> {
        let Some(handle) = self.book(vault).await.position else {
            return Ok(TokenAmounts::zero());
        };

        let amounts = self.positions.collect(handle, vault).await?;
        info!(
            variant = self.rules.name,
            %vault,
            %handle,
            amount0 = %amounts.amount0,
            amount1 = %amounts.amount1,
            "collected fees to vault"
        );
        Ok(amounts)
    }

    async fn stake_position(&self, vault: AccountId) -> Result<Option<PositionId>, VaultError> {
        let Some(rewards) = &self.rewards else {
            return Ok(None);
        };

        let mut book = self.book(vault).await;
        let Some(handle) = book.position else {
            return Err(StateError::NoPosition.into());
        };
        if book.staked {
            return Ok(None);
        }

        rewards.deposit(handle, self.account).await?;
        book.staked = true;
        self.store_book(vault, book).await;

        info!(variant = self.rules.name, %vault, %handle, "position staked");
        Ok(Some(handle))
    }

    async fn unstake_position(&self, vault: AccountId) -> Result<Option<PositionId>, VaultError> {
        let Some(rewards) = &self.rewards else {
            return Ok(None);
        };

        let mut book = self.book(vault).await;
        let Some(handle) = book.position else {
            return Err(StateError::NoPosition.into());
        };
        if !book.staked {
            return Ok(None);
        }

        rewards.withdraw(handle, self.account).await?;
        book.staked = false;
        self.store_book(vault, book).await;

        info!(variant = self.rules.name, %vault, %handle, "position unstaked");
        Ok(Some(handle))
    }

    async fn claim_rewards(&self, vault: AccountId) -> Result<Option<U256>, VaultError> {
        let Some(rewards) = &self.rewards else {
            return Ok(None);
        };

        let book = self.book(vault).await;
        for convention in &self.rules.claim_conventions {
            let attempt = match convention {
                ClaimConvention::ByDepositor => {
                    rewards.claim_by_depositor(self.account, vault).await
                }
                ClaimConvention::ByPosition => match book.position {
                    Some(handle) => rewards.claim_by_position(handle, vault).await,
                    None => continue,
                },
            };

            match attempt {
                Ok(amount) => {
                    info!(
                        variant = self.rules.name,
                        %vault,
                        ?convention,
                        amount = %amount,
                        "rewards claimed"
                    );
                    return Ok(Some(amount));
                }
                Err(err) => {
                    warn!(
                        variant = self.rules.name,
                        %vault,
                        ?convention,
                        error = %err,
                        "claim convention rejected, trying next"
                    );
                }
            }
        }

        warn!(
            variant = self.rules.name,
            %vault,
            "no claim convention succeeded; rewards not claimed"
        );
        Ok(None)
    }
}
