//! Fixed-point tick/price math.
//!
//! Converts between discrete tick indices, Q64.96 square-root prices and
//! token reserve amounts. All multiplications go through 512-bit
//! intermediates so nothing overflows before the final division.

/// Full-width multiply-then-divide primitives.
pub mod full_math;
/// Liquidity/amount conversions over a price range.
pub mod liquidity;
/// Tick spacing alignment and percent-to-tick helpers.
pub mod spacing;
/// Tick index to Q64.96 square-root price.
pub mod tick;

pub use full_math::{mul_div, mul_div_rounding_up};
pub use liquidity::{
    amount0_for_liquidity, amount1_for_liquidity, amounts_for_liquidity, liquidity_for_amount0,
    liquidity_for_amount1, liquidity_for_amounts,
};
pub use spacing::{AlignMode, align_to_spacing, pct_to_ticks};
pub use tick::{MAX_TICK, MIN_TICK, Q96, sqrt_price_at_tick};
