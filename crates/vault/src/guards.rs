//! Pure guard checks.
//!
//! Every check runs locally before the vault issues its first external
//! call, and each failure mode carries its own error variant so callers
//! can branch on cause.

use range_vault_domain::{GuardConfig, TickRange, ValidationError};

/// Rejects ranges narrower or wider than the configured bounds.
pub fn check_width(range: &TickRange, config: &GuardConfig) -> Result<(), ValidationError> {
    let width = range.width();
    if width < config.min_width_ticks {
        return Err(ValidationError::WidthBelowMinimum {
            width,
            min: config.min_width_ticks,
        });
    }
    if width > config.max_width_ticks {
        return Err(ValidationError::WidthAboveMaximum {
            width,
            max: config.max_width_ticks,
        });
    }
    Ok(())
}

/// Rejects bounds that are not exact multiples of the pool spacing.
pub fn check_alignment(range: &TickRange, spacing: i32) -> Result<(), ValidationError> {
    for tick in [range.lower(), range.upper()] {
        if spacing <= 0 || tick % spacing != 0 {
            return Err(ValidationError::UnalignedTick { tick, spacing });
        }
    }
    Ok(())
}

/// Rejects a rebalance attempted before the cooldown has elapsed.
///
/// A vault that never rebalanced has no cooldown to wait out.
pub fn check_cooldown(
    last_rebalance_at: Option<u64>,
    now: u64,
    min_cooldown_secs: u64,
) -> Result<(), ValidationError> {
    let Some(last) = last_rebalance_at else {
        return Ok(());
    };
    let elapsed = now.saturating_sub(last);
    if elapsed < min_cooldown_secs {
        return Err(ValidationError::CooldownActive {
            remaining: min_cooldown_secs - elapsed,
            min_cooldown: min_cooldown_secs,
        });
    }
    Ok(())
}

/// Rejects a mutation while spot has strayed too far from the TWAP.
pub fn check_deviation(
    spot_tick: i32,
    twap_tick: i32,
    max_deviation_ticks: u32,
) -> Result<(), ValidationError> {
    let deviation = spot_tick.abs_diff(twap_tick);
    if deviation > max_deviation_ticks {
        return Err(ValidationError::TwapDeviationExceeded {
            spot: spot_tick,
            twap: twap_tick,
            max_deviation: max_deviation_ticks,
        });
    }
    Ok(())
}
