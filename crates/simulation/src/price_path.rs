//! Random tick paths for oracle and rebalance scenarios.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use range_vault_domain::math::{MAX_TICK, MIN_TICK};

/// Generates a sequence of pool ticks.
pub trait TickPathGenerator {
    fn generate(&mut self, steps: usize) -> Vec<i32>;
}

/// Seeded gaussian random walk on the tick grid.
pub struct RandomTickWalk {
    start_tick: i32,
    sigma_ticks: f64,
    rng: StdRng,
}

impl RandomTickWalk {
    pub fn new(start_tick: i32, sigma_ticks: f64, seed: u64) -> Self {
        Self {
            start_tick,
            sigma_ticks,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TickPathGenerator for RandomTickWalk {
    fn generate(&mut self, steps: usize) -> Vec<i32> {
        let normal = Normal::new(0.0, self.sigma_ticks.abs().max(f64::EPSILON)).unwrap();

        let mut path = Vec::with_capacity(steps + 1);
        let mut tick = self.start_tick;
        path.push(tick);
        for _ in 0..steps {
            let step = normal.sample(&mut self.rng).round() as i32;
            tick = (tick + step).clamp(MIN_TICK, MAX_TICK);
            path.push(tick);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::pool::SimPool;
    use range_vault_domain::TokenId;
    use range_vault_protocols::TwapOracle;
    use std::sync::Arc;

    #[test]
    fn test_walk_is_deterministic_per_seed() {
        let a = RandomTickWalk::new(0, 25.0, 7).generate(50);
        let b = RandomTickWalk::new(0, 25.0, 7).generate(50);
        assert_eq!(a, b);
        assert_eq!(a.len(), 51);
        assert_eq!(a[0], 0);
    }

    #[tokio::test]
    async fn test_twap_stays_within_walked_extremes() {
        let clock = Arc::new(MockClock::new(1_000_000));
        let pool = SimPool::new(
            TokenId::new_unique(),
            TokenId::new_unique(),
            60,
            3000,
            0,
            clock.clone(),
        );

        let mut walk = RandomTickWalk::new(0, 40.0, 42);
        let path = walk.generate(30);
        for &tick in &path[1..] {
            clock.advance(60);
            pool.set_tick(tick).await;
        }
        clock.advance(60);

        let twap = TwapOracle::consult_tick(&pool, 1800).await.unwrap();
        let lo = *path.iter().min().unwrap();
        let hi = *path.iter().max().unwrap();
        assert!(twap >= lo && twap <= hi, "twap {twap} outside [{lo}, {hi}]");
    }
}
