//! Fixed-rate swap counterparty.

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::math::mul_div;
use range_vault_domain::{AccountId, ProtocolError, TokenId};
use range_vault_protocols::{SwapRouter, TokenLedger};
use std::sync::Arc;
use tracing::debug;

use crate::ledger::InMemoryLedger;

/// Router that fills any order at a fixed `rate_num / rate_den` price,
/// acting as its own counterparty.
pub struct SimRouter {
    account: AccountId,
    ledger: Arc<InMemoryLedger>,
    rate_num: U256,
    rate_den: U256,
}

impl SimRouter {
    pub fn new(ledger: Arc<InMemoryLedger>, rate_num: U256, rate_den: U256) -> Self {
        Self {
            account: AccountId::new_unique(),
            ledger,
            rate_num,
            rate_den,
        }
    }

    /// A 1:1 router.
    pub fn par(ledger: Arc<InMemoryLedger>) -> Self {
        Self::new(ledger, U256::one(), U256::one())
    }
}

#[async_trait]
impl SwapRouter for SimRouter {
    fn account(&self) -> AccountId {
        self.account
    }

    async fn swap_exact_in(
        &self,
        token_in: TokenId,
        token_out: TokenId,
        amount_in: U256,
        min_amount_out: U256,
        payer: AccountId,
    ) -> Result<U256, ProtocolError> {
        self.ledger
            .transfer_from(token_in, self.account, payer, self.account, amount_in)
            .await?;

        let amount_out = mul_div(amount_in, self.rate_num, self.rate_den)?;
        if amount_out < min_amount_out {
            return Err(ProtocolError::Rejected {
                service: "swap router".into(),
                reason: "output below minimum".into(),
            });
        }

        self.ledger.mint(token_out, payer, amount_out).await;
        debug!(%token_in, %token_out, %amount_in, %amount_out, "swap filled");
        Ok(amount_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_swap_at_fixed_rate() {
        let ledger = Arc::new(InMemoryLedger::new());
        let router = SimRouter::new(ledger.clone(), U256::from(3u64), U256::from(2u64));
        let token_in = TokenId::new_unique();
        let token_out = TokenId::new_unique();
        let payer = AccountId::new_unique();

        ledger.mint(token_in, payer, U256::from(100u64)).await;
        ledger
            .approve(token_in, payer, router.account(), U256::from(100u64))
            .await
            .unwrap();

        let out = router
            .swap_exact_in(token_in, token_out, U256::from(100u64), U256::from(150u64), payer)
            .await
            .unwrap();
        assert_eq!(out, U256::from(150u64));
        assert_eq!(ledger.balance_of(token_out, payer).await, U256::from(150u64));
        assert_eq!(ledger.balance_of(token_in, payer).await, U256::zero());
    }

    #[tokio::test]
    async fn test_min_out_enforced() {
        let ledger = Arc::new(InMemoryLedger::new());
        let router = SimRouter::par(ledger.clone());
        let token_in = TokenId::new_unique();
        let token_out = TokenId::new_unique();
        let payer = AccountId::new_unique();

        ledger.mint(token_in, payer, U256::from(10u64)).await;
        ledger
            .approve(token_in, payer, router.account(), U256::from(10u64))
            .await
            .unwrap();

        assert!(matches!(
            router
                .swap_exact_in(token_in, token_out, U256::from(10u64), U256::from(11u64), payer)
                .await,
            Err(ProtocolError::Rejected { .. })
        ));
    }
}
