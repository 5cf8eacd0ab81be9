//! 512-bit-intermediate multiply-then-divide.

use crate::error::MathError;
use primitive_types::{U256, U512};

fn widen(x: U256) -> U512 {
    let mut limbs = [0u64; 8];
    limbs[..4].copy_from_slice(&x.0);
    U512(limbs)
}

fn narrow(x: U512) -> Result<U256, MathError> {
    if x.0[4..].iter().any(|&limb| limb != 0) {
        return Err(MathError::Overflow);
    }
    let mut limbs = [0u64; 4];
    limbs.copy_from_slice(&x.0[..4]);
    Ok(U256(limbs))
}

/// Computes `a * b / denominator` with the product held in 512 bits.
///
/// Rounds toward zero. Fails on a zero denominator or when the quotient
/// does not fit 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / widen(denominator);
    narrow(quotient)
}

/// `mul_div` rounding away from zero when the division truncates.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product = a.full_mul(b);
    let denominator = widen(denominator);
    let mut quotient = narrow(product / denominator)?;
    if !(product % denominator).is_zero() {
        quotient = quotient
            .checked_add(U256::one())
            .ok_or(MathError::Overflow)?;
    }
    Ok(quotient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_basic() {
        let a = U256::from(6u64);
        let b = U256::from(7u64);
        let d = U256::from(2u64);
        assert_eq!(mul_div(a, b, d).unwrap(), U256::from(21u64));
    }

    #[test]
    fn test_mul_div_survives_256_bit_product() {
        // (2^200 * 2^100) / 2^150 = 2^150; the product alone needs 300 bits.
        let a = U256::one() << 200;
        let b = U256::one() << 100;
        let d = U256::one() << 150;
        assert_eq!(mul_div(a, b, d).unwrap(), U256::one() << 150);
    }

    #[test]
    fn test_mul_div_overflow_detected() {
        let a = U256::max_value();
        let b = U256::from(2u64);
        assert_eq!(mul_div(a, b, U256::one()), Err(MathError::Overflow));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(U256::one(), U256::one(), U256::zero()),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_rounding_up_only_on_remainder() {
        let a = U256::from(7u64);
        let b = U256::from(1u64);
        let d = U256::from(2u64);
        assert_eq!(mul_div(a, b, d).unwrap(), U256::from(3u64));
        assert_eq!(mul_div_rounding_up(a, b, d).unwrap(), U256::from(4u64));

        let exact = mul_div_rounding_up(U256::from(8u64), b, d).unwrap();
        assert_eq!(exact, U256::from(4u64));
    }
}
