//! Tick index to Q64.96 square-root price.

use crate::error::MathError;
use primitive_types::U256;

/// Lowest tick supported by the price grid.
pub const MIN_TICK: i32 = -887272;
/// Highest tick supported by the price grid.
pub const MAX_TICK: i32 = 887272;

/// 2^96, the Q64.96 unit.
pub const Q96: U256 = U256([0, 0x1_0000_0000, 0, 0]);

/// `sqrt_price_at_tick(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = U256([4295128739, 0, 0, 0]);
/// `sqrt_price_at_tick(MAX_TICK)`.
pub const MAX_SQRT_RATIO: U256 = U256([
    0x5d951d5263988d26,
    0xefd1fc6a50648849,
    0xfffd8963,
    0,
]);

/// Per-bit ladder constants: entry `i` is `sqrt(1.0001^(2^i))` in Q128.128.
const SQRT_LADDER: [U256; 20] = [
    U256([0xaa2d162d1a594001, 0xfffcb933bd6fad37, 0, 0]),
    U256([0x59a46990580e213a, 0xfff97272373d4132, 0, 0]),
    U256([0xef12357cf3c7fdcc, 0xfff2e50f5f656932, 0, 0]),
    U256([0x1c3624eaa0941cd0, 0xffe5caca7e10e4e6, 0, 0]),
    U256([0xc9db58835c926644, 0xffcb9843d60f6159, 0, 0]),
    U256([0x472e6896dfb254c0, 0xff973b41fa98c081, 0, 0]),
    U256([0x43ec78b326b52861, 0xff2ea16466c96a38, 0, 0]),
    U256([0x11c461f1969c3053, 0xfe5dee046a99a2a8, 0, 0]),
    U256([0xdcffc83b479aa3a4, 0xfcbe86c7900a88ae, 0, 0]),
    U256([0x6f2b074cf7815e54, 0xf987a7253ac41317, 0, 0]),
    U256([0x940c7a398e4b70f3, 0xf3392b0822b70005, 0, 0]),
    U256([0x43b29c7fa6e889d9, 0xe7159475a2c29b74, 0, 0]),
    U256([0x845ad8f792aa5825, 0xd097f3bdfd2022b8, 0, 0]),
    U256([0x8a65dc1f90e061e5, 0xa9f746462d870fdf, 0, 0]),
    U256([0x90bb3df62baf32f7, 0x70d869a156d2a1b8, 0, 0]),
    U256([0x81231505542fcfa6, 0x31be135f97d08fd9, 0, 0]),
    U256([0xc677de54f3e99bc9, 0x09aa508b5b7a84e1, 0, 0]),
    U256([0x6699c329225ee604, 0x005d6af8dedb8119, 0, 0]),
    U256([0x1ea926041bedfe98, 0x00002216e584f5fa, 0, 0]),
    U256([0x91f7dc42444e8fa2, 0x00000000048a1703, 0, 0]),
];

/// Multiplies a Q128.128 accumulator by a Q128.128 constant.
fn mul_shift_128(ratio: U256, constant: &U256) -> U256 {
    let product = ratio.full_mul(*constant);
    let shifted = product >> 128;
    let mut limbs = [0u64; 4];
    limbs.copy_from_slice(&shifted.0[..4]);
    U256(limbs)
}

/// Computes `sqrt(1.0001^tick)` as a Q64.96 fixed-point value.
///
/// Walks the 20 bits of `|tick|` through the precomputed ladder in
/// Q128.128, inverts for positive ticks (ticks are symmetric around price
/// 1), then shifts down to Q64.96 rounding up if any truncated bits were
/// nonzero.
pub fn sqrt_price_at_tick(tick: i32) -> Result<U256, MathError> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::TickOutOfRange(tick));
    }

    let abs_tick = tick.unsigned_abs();
    let mut ratio = U256::one() << 128;
    for (i, constant) in SQRT_LADDER.iter().enumerate() {
        if abs_tick & (1 << i) != 0 {
            ratio = mul_shift_128(ratio, constant);
        }
    }

    if tick > 0 {
        ratio = U256::max_value() / ratio;
    }

    let truncated = ratio & U256::from(u32::MAX);
    let mut sqrt_price = ratio >> 32;
    if !truncated.is_zero() {
        sqrt_price += U256::one();
    }
    Ok(sqrt_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_zero_is_exactly_one() {
        assert_eq!(sqrt_price_at_tick(0).unwrap(), Q96);
    }

    #[test]
    fn test_reference_values() {
        // Values cross-checked against the standard AMM tick table.
        assert_eq!(
            sqrt_price_at_tick(1).unwrap(),
            U256::from_dec_str("79232123823359799118286999568").unwrap()
        );
        assert_eq!(
            sqrt_price_at_tick(-1).unwrap(),
            U256::from_dec_str("79224201403219477170569942574").unwrap()
        );
        assert_eq!(
            sqrt_price_at_tick(60).unwrap(),
            U256::from_dec_str("79466191966197645195421774833").unwrap()
        );
        assert_eq!(
            sqrt_price_at_tick(-120).unwrap(),
            U256::from_dec_str("78754240422856966435523493930").unwrap()
        );
    }

    #[test]
    fn test_extremes_match_constants() {
        assert_eq!(sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_RATIO);
        assert_eq!(sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_RATIO);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            sqrt_price_at_tick(MAX_TICK + 1),
            Err(MathError::TickOutOfRange(MAX_TICK + 1))
        );
        assert_eq!(
            sqrt_price_at_tick(MIN_TICK - 1),
            Err(MathError::TickOutOfRange(MIN_TICK - 1))
        );
    }

    #[test]
    fn test_monotonically_increasing() {
        let samples = [
            MIN_TICK, -500_000, -887, -120, -61, -60, -1, 0, 1, 60, 61, 120, 887, 500_000, MAX_TICK,
        ];
        let mut previous = None;
        for tick in samples {
            let price = sqrt_price_at_tick(tick).unwrap();
            if let Some(prev) = previous {
                assert!(price > prev, "price not increasing at tick {tick}");
            }
            previous = Some(price);
        }
    }

    #[test]
    fn test_symmetry_around_one() {
        // sqrt(1.0001^t) * sqrt(1.0001^-t) ~= 1 in Q192.
        for tick in [1, 60, 887, 10_000] {
            let up = sqrt_price_at_tick(tick).unwrap();
            let down = sqrt_price_at_tick(-tick).unwrap();
            let product = up.full_mul(down) >> 192;
            assert_eq!(product.0[0], 1, "asymmetric at tick {tick}");
        }
    }
}
