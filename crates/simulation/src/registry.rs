//! Simulated position registry backed by the domain math.

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::math::{amounts_for_liquidity, liquidity_for_amounts, sqrt_price_at_tick};
use range_vault_domain::{AccountId, PositionId, ProtocolError, TickRange, TokenAmounts};
use range_vault_protocols::{
    Clock, LiquidityPool, MintParams, MintReceipt, PositionInfo, PositionRegistry, TokenLedger,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ledger::InMemoryLedger;
use crate::pool::SimPool;

#[derive(Debug, Clone, Copy)]
struct SimPosition {
    range: TickRange,
    liquidity: u128,
    owed: TokenAmounts,
}

#[derive(Debug, Default)]
struct RegistryState {
    next_handle: u64,
    positions: HashMap<PositionId, SimPosition>,
}

/// Registry that mints, amends and burns positions against a `SimPool`,
/// settling token flows on an `InMemoryLedger`.
pub struct SimPositionRegistry {
    account: AccountId,
    pool: Arc<SimPool>,
    ledger: Arc<InMemoryLedger>,
    clock: Arc<dyn Clock>,
    state: RwLock<RegistryState>,
}

impl SimPositionRegistry {
    pub fn new(pool: Arc<SimPool>, ledger: Arc<InMemoryLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            account: AccountId::new_unique(),
            pool,
            ledger,
            clock,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Test helper: accrues fees on a position and funds the registry so a
    /// later collect can pay them out.
    pub async fn accrue_fees(
        &self,
        handle: PositionId,
        fees: TokenAmounts,
    ) -> Result<(), ProtocolError> {
        let (token0, token1) = self.pool.tokens().await?;
        let mut state = self.state.write().await;
        let position = state
            .positions
            .get_mut(&handle)
            .ok_or(ProtocolError::UnknownPosition(handle))?;
        position.owed = position.owed.saturating_add(&fees);
        drop(state);

        self.ledger.mint(token0, self.account, fees.amount0).await;
        self.ledger.mint(token1, self.account, fees.amount1).await;
        Ok(())
    }

    fn sqrt_bounds(range: &TickRange) -> Result<(U256, U256), ProtocolError> {
        Ok((
            sqrt_price_at_tick(range.lower())?,
            sqrt_price_at_tick(range.upper())?,
        ))
    }
}

#[async_trait]
impl PositionRegistry for SimPositionRegistry {
    fn account(&self) -> AccountId {
        self.account
    }

    async fn mint(&self, params: MintParams) -> Result<MintReceipt, ProtocolError> {
        if params.deadline < self.clock.now() {
            return Err(ProtocolError::Rejected {
                service: "position registry".into(),
                reason: "deadline expired".into(),
            });
        }

        let spot = self.pool.slot0().await?;
        let (sqrt_lower, sqrt_upper) = Self::sqrt_bounds(&params.range)?;

        let liquidity = liquidity_for_amounts(
            spot.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            params.desired.amount0,
            params.desired.amount1,
        )?;
        if liquidity == 0 {
            return Err(ProtocolError::Rejected {
                service: "position registry".into(),
                reason: "mint would create zero liquidity".into(),
            });
        }

        let (used0, used1) =
            amounts_for_liquidity(spot.sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity)?;
        let (token0, token1) = self.pool.tokens().await?;
        if !used0.is_zero() {
            self.ledger
                .transfer_from(token0, self.account, params.payer, self.account, used0)
                .await?;
        }
        if !used1.is_zero() {
            self.ledger
                .transfer_from(token1, self.account, params.payer, self.account, used1)
                .await?;
        }

        let handle = {
            let mut state = self.state.write().await;
            state.next_handle += 1;
            let handle = PositionId::new(state.next_handle);
            state.positions.insert(
                handle,
                SimPosition {
                    range: params.range,
                    liquidity,
                    owed: TokenAmounts::zero(),
                },
            );
            handle
        };

        debug!(%handle, liquidity, "position minted");
        Ok(MintReceipt {
            handle,
            liquidity,
            used: TokenAmounts::new(used0, used1),
        })
    }

    async fn decrease_liquidity(
        &self,
        handle: PositionId,
        liquidity: u128,
    ) -> Result<TokenAmounts, ProtocolError> {
        let spot = self.pool.slot0().await?;

        let mut state = self.state.write().await;
        let position = state
            .positions
            .get_mut(&handle)
            .ok_or(ProtocolError::UnknownPosition(handle))?;
        if liquidity > position.liquidity {
            return Err(ProtocolError::Rejected {
                service: "position registry".into(),
                reason: "decrease exceeds position liquidity".into(),
            });
        }

        let (sqrt_lower, sqrt_upper) = Self::sqrt_bounds(&position.range)?;
        let (amount0, amount1) =
            amounts_for_liquidity(spot.sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity)?;

        position.liquidity -= liquidity;
        let amounts = TokenAmounts::new(amount0, amount1);
        position.owed = position.owed.saturating_add(&amounts);

        debug!(%handle, liquidity, "liquidity decreased");
        Ok(amounts)
    }

    async fn collect(
        &self,
        handle: PositionId,
        recipient: AccountId,
    ) -> Result<TokenAmounts, ProtocolError> {
        let owed = {
            let mut state = self.state.write().await;
            let position = state
                .positions
                .get_mut(&handle)
                .ok_or(ProtocolError::UnknownPosition(handle))?;
            let owed = position.owed;
            position.owed = TokenAmounts::zero();
            owed
        };

        let (token0, token1) = self.pool.tokens().await?;
        if !owed.amount0.is_zero() {
            self.ledger
                .transfer(token0, self.account, recipient, owed.amount0)
                .await?;
        }
        if !owed.amount1.is_zero() {
            self.ledger
                .transfer(token1, self.account, recipient, owed.amount1)
                .await?;
        }

        debug!(%handle, %recipient, amount0 = %owed.amount0, amount1 = %owed.amount1, "collected");
        Ok(owed)
    }

    async fn burn(&self, handle: PositionId) -> Result<(), ProtocolError> {
        let mut state = self.state.write().await;
        let position = state
            .positions
            .get(&handle)
            .ok_or(ProtocolError::UnknownPosition(handle))?;
        if position.liquidity != 0 || !position.owed.is_zero() {
            return Err(ProtocolError::PositionNotEmpty(handle));
        }
        state.positions.remove(&handle);
        debug!(%handle, "position burned");
        Ok(())
    }

    async fn position_info(&self, handle: PositionId) -> Result<PositionInfo, ProtocolError> {
        let state = self.state.read().await;
        let position = state
            .positions
            .get(&handle)
            .ok_or(ProtocolError::UnknownPosition(handle))?;
        Ok(PositionInfo {
            range: position.range,
            liquidity: position.liquidity,
            owed: position.owed,
        })
    }
}
