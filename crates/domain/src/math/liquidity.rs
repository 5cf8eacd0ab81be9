//! Conversions between liquidity and token amounts over a price range.
//!
//! Prices are Q64.96 square-root prices. Amount formulas round toward
//! zero, so amounts re-derived from a computed liquidity never exceed the
//! balances the liquidity was computed from.

use crate::error::MathError;
use crate::math::full_math::mul_div;
use crate::math::tick::Q96;
use primitive_types::U256;

fn ordered(sqrt_a: U256, sqrt_b: U256) -> Result<(U256, U256), MathError> {
    if sqrt_a.is_zero() || sqrt_a >= sqrt_b {
        return Err(MathError::InvalidRange);
    }
    Ok((sqrt_a, sqrt_b))
}

fn to_liquidity(value: U256) -> Result<u128, MathError> {
    if value.bits() > 128 {
        return Err(MathError::Overflow);
    }
    Ok(value.low_u128())
}

/// Amount of asset0 held by `liquidity` between two sqrt prices.
///
/// `amount0 = L * 2^96 * (sqrt_b - sqrt_a) / (sqrt_b * sqrt_a)`
pub fn amount0_for_liquidity(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
) -> Result<U256, MathError> {
    let (sqrt_a, sqrt_b) = ordered(sqrt_a, sqrt_b)?;
    let numerator = U256::from(liquidity) << 96;
    Ok(mul_div(numerator, sqrt_b - sqrt_a, sqrt_b)? / sqrt_a)
}

/// Amount of asset1 held by `liquidity` between two sqrt prices.
///
/// `amount1 = L * (sqrt_b - sqrt_a) / 2^96`
pub fn amount1_for_liquidity(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: u128,
) -> Result<U256, MathError> {
    let (sqrt_a, sqrt_b) = ordered(sqrt_a, sqrt_b)?;
    mul_div(U256::from(liquidity), sqrt_b - sqrt_a, Q96)
}

/// Token amounts held by `liquidity` over `[sqrt_lower, sqrt_upper]` at the
/// current price.
///
/// Three cases: price at or below the range puts all value in asset0,
/// price at or above puts all value in asset1, and a price inside the
/// range splits using the current price as one boundary of each one-sided
/// formula.
pub fn amounts_for_liquidity(
    sqrt_price: U256,
    sqrt_lower: U256,
    sqrt_upper: U256,
    liquidity: u128,
) -> Result<(U256, U256), MathError> {
    let (sqrt_lower, sqrt_upper) = ordered(sqrt_lower, sqrt_upper)?;

    if sqrt_price <= sqrt_lower {
        Ok((
            amount0_for_liquidity(sqrt_lower, sqrt_upper, liquidity)?,
            U256::zero(),
        ))
    } else if sqrt_price < sqrt_upper {
        Ok((
            amount0_for_liquidity(sqrt_price, sqrt_upper, liquidity)?,
            amount1_for_liquidity(sqrt_lower, sqrt_price, liquidity)?,
        ))
    } else {
        Ok((
            U256::zero(),
            amount1_for_liquidity(sqrt_lower, sqrt_upper, liquidity)?,
        ))
    }
}

/// Largest liquidity fully funded by `amount0` between two sqrt prices.
pub fn liquidity_for_amount0(
    sqrt_a: U256,
    sqrt_b: U256,
    amount0: U256,
) -> Result<u128, MathError> {
    let (sqrt_a, sqrt_b) = ordered(sqrt_a, sqrt_b)?;
    let intermediate = mul_div(sqrt_a, sqrt_b, Q96)?;
    to_liquidity(mul_div(amount0, intermediate, sqrt_b - sqrt_a)?)
}

/// Largest liquidity fully funded by `amount1` between two sqrt prices.
pub fn liquidity_for_amount1(
    sqrt_a: U256,
    sqrt_b: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (sqrt_a, sqrt_b) = ordered(sqrt_a, sqrt_b)?;
    to_liquidity(mul_div(amount1, Q96, sqrt_b - sqrt_a)?)
}

/// Largest liquidity fully funded by both amounts at the current price.
///
/// Inside the range this is the minimum of the two one-sided results, so
/// the returned liquidity never requires more of either asset than was
/// offered.
pub fn liquidity_for_amounts(
    sqrt_price: U256,
    sqrt_lower: U256,
    sqrt_upper: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, MathError> {
    let (sqrt_lower, sqrt_upper) = ordered(sqrt_lower, sqrt_upper)?;

    if sqrt_price <= sqrt_lower {
        liquidity_for_amount0(sqrt_lower, sqrt_upper, amount0)
    } else if sqrt_price < sqrt_upper {
        let from0 = liquidity_for_amount0(sqrt_price, sqrt_upper, amount0)?;
        let from1 = liquidity_for_amount1(sqrt_lower, sqrt_price, amount1)?;
        Ok(from0.min(from1))
    } else {
        liquidity_for_amount1(sqrt_lower, sqrt_upper, amount1)
    }
}
