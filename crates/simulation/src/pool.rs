//! Simulated pool with a cumulative-tick observation history.

use async_trait::async_trait;
use range_vault_domain::math::sqrt_price_at_tick;
use range_vault_domain::{ProtocolError, SpotPrice, TokenId};
use range_vault_protocols::{Clock, LiquidityPool};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Tick history entry. The cumulative is the integral of the tick over
/// time since pool creation.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    at: u64,
    cumulative: i64,
    tick: i32,
}

/// In-memory pool: fixed token pair and spacing, driveable tick.
pub struct SimPool {
    token0: TokenId,
    token1: TokenId,
    tick_spacing: i32,
    fee_tier: u32,
    clock: Arc<dyn Clock>,
    checkpoints: RwLock<Vec<Checkpoint>>,
}

impl SimPool {
    pub fn new(
        token0: TokenId,
        token1: TokenId,
        tick_spacing: i32,
        fee_tier: u32,
        initial_tick: i32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let genesis = Checkpoint {
            at: clock.now(),
            cumulative: 0,
            tick: initial_tick,
        };
        Self {
            token0,
            token1,
            tick_spacing,
            fee_tier,
            clock,
            checkpoints: RwLock::new(vec![genesis]),
        }
    }

    /// Moves the pool to a new tick, closing the accumulation of the
    /// previous one.
    pub async fn set_tick(&self, tick: i32) {
        let now = self.clock.now();
        let mut checkpoints = self.checkpoints.write().await;
        let last = checkpoints[checkpoints.len() - 1];
        let cumulative = last.cumulative + last.tick as i64 * (now - last.at) as i64;
        checkpoints.push(Checkpoint {
            at: now,
            cumulative,
            tick,
        });
        debug!(tick, at = now, "pool tick moved");
    }

    /// Current tick.
    pub async fn current_tick(&self) -> i32 {
        let checkpoints = self.checkpoints.read().await;
        checkpoints[checkpoints.len() - 1].tick
    }

    fn cumulative_at(checkpoints: &[Checkpoint], at: u64) -> i64 {
        // Callers guarantee `at` is covered by history.
        let checkpoint = checkpoints
            .iter()
            .rev()
            .find(|checkpoint| checkpoint.at <= at)
            .unwrap_or(&checkpoints[0]);
        checkpoint.cumulative + checkpoint.tick as i64 * (at - checkpoint.at) as i64
    }
}

#[async_trait]
impl LiquidityPool for SimPool {
    async fn tick_spacing(&self) -> Result<i32, ProtocolError> {
        Ok(self.tick_spacing)
    }

    async fn slot0(&self) -> Result<SpotPrice, ProtocolError> {
        let tick = self.current_tick().await;
        Ok(SpotPrice::new(sqrt_price_at_tick(tick)?, tick))
    }

    async fn observe(&self, seconds_agos: &[u64]) -> Result<Vec<i64>, ProtocolError> {
        let now = self.clock.now();
        let checkpoints = self.checkpoints.read().await;
        let oldest = checkpoints[0].at;

        let mut cumulatives = Vec::with_capacity(seconds_agos.len());
        for &age in seconds_agos {
            if age > now || now - age < oldest {
                return Err(ProtocolError::InsufficientObservationHistory { window: age });
            }
            cumulatives.push(Self::cumulative_at(&checkpoints, now - age));
        }
        Ok(cumulatives)
    }

    async fn tokens(&self) -> Result<(TokenId, TokenId), ProtocolError> {
        Ok((self.token0, self.token1))
    }

    async fn fee_tier(&self) -> Result<u32, ProtocolError> {
        Ok(self.fee_tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use range_vault_protocols::TwapOracle;

    fn world(initial_tick: i32) -> (Arc<MockClock>, SimPool) {
        let clock = Arc::new(MockClock::new(1_000_000));
        let pool = SimPool::new(
            TokenId::new_unique(),
            TokenId::new_unique(),
            60,
            3000,
            initial_tick,
            clock.clone(),
        );
        (clock, pool)
    }

    #[tokio::test]
    async fn test_constant_tick_twap_equals_spot() {
        let (clock, pool) = world(120);
        clock.advance(600);
        assert_eq!(TwapOracle::consult_tick(&pool, 600).await.unwrap(), 120);
    }

    #[tokio::test]
    async fn test_twap_averages_tick_moves() {
        let (clock, pool) = world(0);
        clock.advance(300);
        pool.set_tick(600).await;
        clock.advance(300);

        // Half the window at 0, half at 600.
        assert_eq!(TwapOracle::consult_tick(&pool, 600).await.unwrap(), 300);
    }

    #[tokio::test]
    async fn test_negative_ticks_floor_toward_negative_infinity() {
        let (clock, pool) = world(-1);
        clock.advance(1);
        pool.set_tick(-2).await;
        clock.advance(1);

        // One second at -1, one at -2: delta -3 over 2 floors to -2.
        assert_eq!(TwapOracle::consult_tick(&pool, 2).await.unwrap(), -2);
    }

    #[tokio::test]
    async fn test_insufficient_history_is_an_error() {
        let (clock, pool) = world(0);
        clock.advance(100);

        let err = pool.observe(&[101, 0]).await;
        assert!(matches!(
            err,
            Err(ProtocolError::InsufficientObservationHistory { window: 101 })
        ));
    }

    #[tokio::test]
    async fn test_slot0_reports_current_tick() {
        let (_clock, pool) = world(60);
        let spot = pool.slot0().await.unwrap();
        assert_eq!(spot.tick, 60);
        assert_eq!(
            spot.sqrt_price_x96,
            sqrt_price_at_tick(60).unwrap()
        );
    }
}
