//! Simulated reward registry with configurable calling conventions.

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::{AccountId, PositionId, ProtocolError, TokenId};
use range_vault_protocols::RewardRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::ledger::InMemoryLedger;

#[derive(Debug, Default)]
struct RewardState {
    /// Handle -> depositor.
    staked: HashMap<PositionId, AccountId>,
    /// Pending rewards keyed by depositor.
    pending: HashMap<AccountId, U256>,
}

/// Reward registry that pays a dedicated reward token. Either calling
/// convention can be configured to reject, which is how tests exercise
/// the adapter's fallback chain.
pub struct SimRewardRegistry {
    reward_token: TokenId,
    ledger: Arc<InMemoryLedger>,
    accept_by_depositor: bool,
    accept_by_position: bool,
    state: RwLock<RewardState>,
}

impl SimRewardRegistry {
    pub fn new(reward_token: TokenId, ledger: Arc<InMemoryLedger>) -> Self {
        Self {
            reward_token,
            ledger,
            accept_by_depositor: true,
            accept_by_position: true,
            state: RwLock::new(RewardState::default()),
        }
    }

    /// Rejects the per-depositor claim convention.
    pub fn rejecting_depositor_claims(mut self) -> Self {
        self.accept_by_depositor = false;
        self
    }

    /// Rejects the per-position claim convention.
    pub fn rejecting_position_claims(mut self) -> Self {
        self.accept_by_position = false;
        self
    }

    /// The token rewards are paid in.
    pub fn reward_token(&self) -> TokenId {
        self.reward_token
    }

    /// Test helper: accrues pending rewards for a depositor.
    pub async fn accrue(&self, depositor: AccountId, amount: U256) {
        let mut state = self.state.write().await;
        let pending = state.pending.entry(depositor).or_default();
        *pending = pending.saturating_add(amount);
    }

    /// Whether a handle is currently staked.
    pub async fn is_staked(&self, handle: PositionId) -> bool {
        self.state.read().await.staked.contains_key(&handle)
    }

    async fn pay_out(&self, depositor: AccountId, recipient: AccountId) -> U256 {
        let amount = self
            .state
            .write()
            .await
            .pending
            .remove(&depositor)
            .unwrap_or_default();
        if !amount.is_zero() {
            self.ledger.mint(self.reward_token, recipient, amount).await;
        }
        amount
    }
}

#[async_trait]
impl RewardRegistry for SimRewardRegistry {
    async fn deposit(&self, handle: PositionId, depositor: AccountId) -> Result<(), ProtocolError> {
        let mut state = self.state.write().await;
        if state.staked.contains_key(&handle) {
            return Err(ProtocolError::Rejected {
                service: "reward registry".into(),
                reason: format!("position {handle} is already staked"),
            });
        }
        state.staked.insert(handle, depositor);
        debug!(%handle, %depositor, "position staked");
        Ok(())
    }

    async fn withdraw(
        &self,
        handle: PositionId,
        depositor: AccountId,
    ) -> Result<(), ProtocolError> {
        let mut state = self.state.write().await;
        match state.staked.get(&handle) {
            Some(owner) if *owner == depositor => {
                state.staked.remove(&handle);
                debug!(%handle, %depositor, "position unstaked");
                Ok(())
            }
            _ => Err(ProtocolError::Rejected {
                service: "reward registry".into(),
                reason: format!("position {handle} is not staked by {depositor}"),
            }),
        }
    }

    async fn claim_by_position(
        &self,
        handle: PositionId,
        recipient: AccountId,
    ) -> Result<U256, ProtocolError> {
        if !self.accept_by_position {
            return Err(ProtocolError::ClaimRejected(
                "per-position claims unsupported".into(),
            ));
        }
        let depositor = {
            let state = self.state.read().await;
            state.staked.get(&handle).copied()
        };
        let Some(depositor) = depositor else {
            return Err(ProtocolError::ClaimRejected(format!(
                "position {handle} is not staked"
            )));
        };
        Ok(self.pay_out(depositor, recipient).await)
    }

    async fn claim_by_depositor(
        &self,
        depositor: AccountId,
        recipient: AccountId,
    ) -> Result<U256, ProtocolError> {
        if !self.accept_by_depositor {
            return Err(ProtocolError::ClaimRejected(
                "per-depositor claims unsupported".into(),
            ));
        }
        Ok(self.pay_out(depositor, recipient).await)
    }
}
