//! Per-protocol quirk tables.
//!
//! The three supported protocols share one adapter body; everything that
//! genuinely differs between them lives here.

use serde::{Deserialize, Serialize};

/// Calling convention for a reward-registry claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimConvention {
    /// Claim addressed by the depositor account.
    ByDepositor,
    /// Claim addressed by the position handle.
    ByPosition,
}

/// Behavioral quirks of a protocol variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRules {
    /// Variant name, for logs.
    pub name: &'static str,
    /// Reject a mint whose range contains the spot tick unless both
    /// computed amounts are strictly positive.
    pub require_two_sided_in_range: bool,
    /// Refuse to rebalance or exit a staked position instead of
    /// unstaking implicitly.
    pub forbid_mutation_while_staked: bool,
    /// Ordered claim conventions to attempt; first success wins.
    pub claim_conventions: Vec<ClaimConvention>,
}

impl VariantRules {
    /// Plain v3 pools: no reward registry, permissive mints.
    pub fn uniswap_v3() -> Self {
        Self {
            name: "uniswap-v3",
            require_two_sided_in_range: false,
            forbid_mutation_while_staked: false,
            claim_conventions: vec![],
        }
    }

    /// Slipstream-style pools with gauge staking. Rejects single-sided
    /// in-range mints and claims by depositor first, falling back to the
    /// per-position convention.
    pub fn slipstream() -> Self {
        Self {
            name: "slipstream",
            require_two_sided_in_range: true,
            forbid_mutation_while_staked: false,
            claim_conventions: vec![ClaimConvention::ByDepositor, ClaimConvention::ByPosition],
        }
    }

    /// Pancake-style pools with farm staking. A staked position must be
    /// unstaked explicitly before any lifecycle mutation.
    pub fn pancake_v3() -> Self {
        Self {
            name: "pancake-v3",
            require_two_sided_in_range: false,
            forbid_mutation_while_staked: true,
            claim_conventions: vec![ClaimConvention::ByPosition],
        }
    }
}
