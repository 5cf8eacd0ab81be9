//! Time-weighted average tick over a trailing window.

use crate::services::LiquidityPool;
use range_vault_domain::ProtocolError;
use tracing::debug;

/// Stateless TWAP helper over a pool's cumulative-tick observations.
pub struct TwapOracle;

impl TwapOracle {
    /// Returns the time-weighted average tick over the trailing `window`
    /// seconds.
    ///
    /// The division rounds toward negative infinity, matching the
    /// reference oracle's behavior for negative cumulative deltas. A pool
    /// without enough history for `window` is a caller-visible failure,
    /// never an approximation.
    pub async fn consult_tick(
        pool: &dyn LiquidityPool,
        window: u64,
    ) -> Result<i32, ProtocolError> {
        if window == 0 {
            return Err(ProtocolError::InvalidOracleWindow);
        }

        let cumulatives = pool.observe(&[window, 0]).await?;
        if cumulatives.len() != 2 {
            return Err(ProtocolError::Rejected {
                service: "pool".into(),
                reason: format!("expected 2 observations, got {}", cumulatives.len()),
            });
        }

        let delta = cumulatives[1] - cumulatives[0];
        let window = window as i64;
        let mut tick = delta / window;
        if delta < 0 && delta % window != 0 {
            tick -= 1;
        }

        debug!(window, delta, tick, "TWAP consult");
        Ok(tick as i32)
    }
}
