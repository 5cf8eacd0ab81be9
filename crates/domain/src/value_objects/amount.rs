//! Paired token amounts.

use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A pair of raw token amounts, ordered as the pool orders its assets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmounts {
    /// Raw amount of asset0.
    pub amount0: U256,
    /// Raw amount of asset1.
    pub amount1: U256,
}

impl TokenAmounts {
    pub fn new(amount0: U256, amount1: U256) -> Self {
        Self { amount0, amount1 }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// True when both sides are zero.
    pub fn is_zero(&self) -> bool {
        self.amount0.is_zero() && self.amount1.is_zero()
    }

    /// Component-wise saturating sum.
    pub fn saturating_add(&self, other: &Self) -> Self {
        Self {
            amount0: self.amount0.saturating_add(other.amount0),
            amount1: self.amount1.saturating_add(other.amount1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_sum() {
        let zero = TokenAmounts::zero();
        assert!(zero.is_zero());

        let a = TokenAmounts::new(U256::from(3u64), U256::from(0u64));
        let b = TokenAmounts::new(U256::from(1u64), U256::from(2u64));
        let sum = a.saturating_add(&b);
        assert_eq!(sum.amount0, U256::from(4u64));
        assert_eq!(sum.amount1, U256::from(2u64));
        assert!(!sum.is_zero());
    }
}
