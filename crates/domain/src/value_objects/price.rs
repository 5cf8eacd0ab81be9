//! Spot price as reported by a pool.

use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// A pool's current price: the exact Q64.96 square-root price together with
/// the tick it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotPrice {
    /// Square-root of the asset1/asset0 price, Q64.96 fixed point.
    pub sqrt_price_x96: U256,
    /// Tick containing the current price.
    pub tick: i32,
}

impl SpotPrice {
    pub fn new(sqrt_price_x96: U256, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
        }
    }

    /// Approximate asset1/asset0 price for display and metrics.
    ///
    /// The exact value lives in `sqrt_price_x96`; this conversion goes
    /// through f64 and is not suitable for settlement math.
    pub fn price(&self) -> Option<Decimal> {
        let sqrt: f64 = self.sqrt_price_x96.to_string().parse().ok()?;
        let ratio = sqrt / 2f64.powi(96);
        Decimal::from_f64(ratio * ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_at_tick_zero_is_one() {
        let spot = SpotPrice::new(U256::from(1u64) << 96, 0);
        assert_eq!(spot.price().unwrap(), dec!(1));
    }

    #[test]
    fn test_price_scales_quadratically() {
        // Doubling the sqrt price quadruples the price.
        let spot = SpotPrice::new(U256::from(2u64) << 96, 13863);
        let price = spot.price().unwrap().to_f64().unwrap();
        assert!((price - 4.0).abs() < 1e-9);
    }
}
