//! Shared world fixture: a vault wired to the in-memory protocol stack.
#![allow(dead_code)] // each test binary uses a different slice of the fixture

use std::sync::Arc;

use primitive_types::U256;
use range_vault_core::vault::RangeVault;
use range_vault_domain::math::{amounts_for_liquidity, sqrt_price_at_tick};
use range_vault_domain::{AccountId, GuardConfig, TokenId};
use range_vault_protocols::{
    LiquidityAdapter, LiquidityPool, PositionRegistry, RangeAdapter, TokenLedger,
};
use range_vault_simulation::{
    InMemoryLedger, MockClock, SimPool, SimPositionRegistry, SimRewardRegistry,
};

pub const START_AT: u64 = 1_700_000_000;
pub const SPACING: i32 = 60;
pub const INITIAL_FUNDS: u64 = 1_000;

/// Protocol variant the world is wired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    UniswapV3,
    Slipstream,
    PancakeV3,
}

pub struct WorldConfig {
    pub flavor: Flavor,
    pub reject_depositor_claims: bool,
    pub reject_position_claims: bool,
    pub guards: GuardConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            flavor: Flavor::UniswapV3,
            reject_depositor_claims: false,
            reject_position_claims: false,
            guards: GuardConfig {
                min_cooldown_secs: 3600,
                min_width_ticks: 120,
                max_width_ticks: 1200,
                max_twap_deviation_ticks: 50,
                twap_window_secs: 600,
            },
        }
    }
}

pub struct World {
    pub clock: Arc<MockClock>,
    pub ledger: Arc<InMemoryLedger>,
    pub pool: Arc<SimPool>,
    pub registry: Arc<SimPositionRegistry>,
    pub rewards: Option<Arc<SimRewardRegistry>>,
    pub adapter: Arc<RangeAdapter>,
    pub vault: RangeVault,
    pub owner: AccountId,
    pub token0: TokenId,
    pub token1: TokenId,
    pub reward_token: TokenId,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a funded world with the adapter already wired into the vault.
pub async fn build(config: WorldConfig) -> World {
    init_tracing();

    let clock = Arc::new(MockClock::new(START_AT));
    let ledger = Arc::new(InMemoryLedger::new());
    let token0 = TokenId::new_unique();
    let token1 = TokenId::new_unique();
    let reward_token = TokenId::new_unique();

    let pool = Arc::new(SimPool::new(
        token0,
        token1,
        SPACING,
        3000,
        0,
        clock.clone(),
    ));
    let registry = Arc::new(SimPositionRegistry::new(
        pool.clone(),
        ledger.clone(),
        clock.clone(),
    ));

    let mut rewards_registry = SimRewardRegistry::new(reward_token, ledger.clone());
    if config.reject_depositor_claims {
        rewards_registry = rewards_registry.rejecting_depositor_claims();
    }
    if config.reject_position_claims {
        rewards_registry = rewards_registry.rejecting_position_claims();
    }
    let rewards_registry = Arc::new(rewards_registry);

    let (adapter, rewards) = match config.flavor {
        Flavor::UniswapV3 => (
            RangeAdapter::uniswap_v3(
                pool.clone(),
                registry.clone(),
                ledger.clone(),
                clock.clone(),
                config.guards,
            )
            .unwrap(),
            None,
        ),
        Flavor::Slipstream => (
            RangeAdapter::slipstream(
                pool.clone(),
                registry.clone(),
                rewards_registry.clone(),
                ledger.clone(),
                clock.clone(),
                config.guards,
            )
            .unwrap(),
            Some(rewards_registry),
        ),
        Flavor::PancakeV3 => (
            RangeAdapter::pancake_v3(
                pool.clone(),
                registry.clone(),
                rewards_registry.clone(),
                ledger.clone(),
                clock.clone(),
                config.guards,
            )
            .unwrap(),
            Some(rewards_registry),
        ),
    };

    let owner = AccountId::new_unique();
    let vault = RangeVault::new(owner, ledger.clone(), clock.clone());

    ledger
        .mint(token0, vault.id(), U256::from(INITIAL_FUNDS))
        .await;
    ledger
        .mint(token1, vault.id(), U256::from(INITIAL_FUNDS))
        .await;

    // The registry account stands in for the pool's aggregate reserves, so
    // withdrawals stay solvent when the price moves between mint and exit.
    ledger
        .mint(token0, registry.account(), U256::from(1_000_000_000u64))
        .await;
    ledger
        .mint(token1, registry.account(), U256::from(1_000_000_000u64))
        .await;

    vault
        .set_adapter_once(owner, adapter.clone())
        .await
        .unwrap();

    World {
        clock,
        ledger,
        pool,
        registry,
        rewards,
        adapter,
        vault,
        owner,
        token0,
        token1,
        reward_token,
    }
}

pub async fn build_default() -> World {
    build(WorldConfig::default()).await
}

impl World {
    /// The vault's idle ledger balances.
    pub async fn idle_balances(&self) -> (U256, U256) {
        (
            self.ledger.balance_of(self.token0, self.vault.id()).await,
            self.ledger.balance_of(self.token1, self.vault.id()).await,
        )
    }

    /// Idle plus in-position value (principal at the current spot price,
    /// plus owed amounts).
    pub async fn total_holdings(&self) -> (U256, U256) {
        let (mut total0, mut total1) = self.idle_balances().await;

        if let Some(info) = self
            .adapter
            .position_info(self.vault.id())
            .await
            .unwrap()
        {
            let spot = self.pool.slot0().await.unwrap();
            let sqrt_lower = sqrt_price_at_tick(info.range.lower()).unwrap();
            let sqrt_upper = sqrt_price_at_tick(info.range.upper()).unwrap();
            let (in0, in1) = amounts_for_liquidity(
                spot.sqrt_price_x96,
                sqrt_lower,
                sqrt_upper,
                info.liquidity,
            )
            .unwrap();
            total0 = total0 + in0 + info.owed.amount0;
            total1 = total1 + in1 + info.owed.amount1;
        }

        (total0, total1)
    }
}

/// Absolute difference helper for rounding-tolerance assertions.
pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b { a - b } else { b - a }
}
