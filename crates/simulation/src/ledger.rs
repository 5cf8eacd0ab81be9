//! In-memory token ledger with balances and allowances.

use async_trait::async_trait;
use primitive_types::U256;
use range_vault_domain::{AccountId, ProtocolError, TokenId};
use range_vault_protocols::TokenLedger;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<(TokenId, AccountId), U256>,
    /// Keyed by (token, owner, spender).
    allowances: HashMap<(TokenId, AccountId, AccountId), U256>,
}

impl LedgerState {
    fn debit(
        &mut self,
        token: TokenId,
        account: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        let balance = self.balances.entry((token, account)).or_default();
        if *balance < amount {
            return Err(ProtocolError::InsufficientBalance { token, account });
        }
        *balance -= amount;
        Ok(())
    }

    fn credit(&mut self, token: TokenId, account: AccountId, amount: U256) {
        *self.balances.entry((token, account)).or_default() += amount;
    }
}

/// Standard fungible-token semantics over process memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test faucet: creates `amount` of `token` in `to`.
    pub async fn mint(&self, token: TokenId, to: AccountId, amount: U256) {
        self.state.write().await.credit(token, to, amount);
    }
}

#[async_trait]
impl TokenLedger for InMemoryLedger {
    async fn balance_of(&self, token: TokenId, account: AccountId) -> U256 {
        self.state
            .read()
            .await
            .balances
            .get(&(token, account))
            .copied()
            .unwrap_or_default()
    }

    async fn transfer(
        &self,
        token: TokenId,
        from: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        let mut state = self.state.write().await;
        state.debit(token, from, amount)?;
        state.credit(token, to, amount);
        Ok(())
    }

    async fn transfer_from(
        &self,
        token: TokenId,
        spender: AccountId,
        owner: AccountId,
        to: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        let mut state = self.state.write().await;

        let allowance = state
            .allowances
            .entry((token, owner, spender))
            .or_default();
        if *allowance < amount {
            return Err(ProtocolError::InsufficientAllowance {
                token,
                owner,
                spender,
            });
        }
        // An all-ones allowance is treated as unlimited and not decremented.
        if *allowance != U256::max_value() {
            *allowance -= amount;
        }

        state.debit(token, owner, amount)?;
        state.credit(token, to, amount);
        Ok(())
    }

    async fn approve(
        &self,
        token: TokenId,
        owner: AccountId,
        spender: AccountId,
        amount: U256,
    ) -> Result<(), ProtocolError> {
        self.state
            .write()
            .await
            .allowances
            .insert((token, owner, spender), amount);
        Ok(())
    }

    async fn allowance(&self, token: TokenId, owner: AccountId, spender: AccountId) -> U256 {
        self.state
            .read()
            .await
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transfer_requires_balance() {
        let ledger = InMemoryLedger::new();
        let token = TokenId::new_unique();
        let a = AccountId::new_unique();
        let b = AccountId::new_unique();

        ledger.mint(token, a, U256::from(100u64)).await;
        ledger.transfer(token, a, b, U256::from(60u64)).await.unwrap();
        assert_eq!(ledger.balance_of(token, a).await, U256::from(40u64));
        assert_eq!(ledger.balance_of(token, b).await, U256::from(60u64));

        let err = ledger.transfer(token, a, b, U256::from(41u64)).await;
        assert!(matches!(
            err,
            Err(ProtocolError::InsufficientBalance { .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_from_consumes_allowance() {
        let ledger = InMemoryLedger::new();
        let token = TokenId::new_unique();
        let owner = AccountId::new_unique();
        let spender = AccountId::new_unique();
        let sink = AccountId::new_unique();

        ledger.mint(token, owner, U256::from(100u64)).await;
        ledger
            .approve(token, owner, spender, U256::from(50u64))
            .await
            .unwrap();

        ledger
            .transfer_from(token, spender, owner, sink, U256::from(30u64))
            .await
            .unwrap();
        assert_eq!(
            ledger.allowance(token, owner, spender).await,
            U256::from(20u64)
        );

        let err = ledger
            .transfer_from(token, spender, owner, sink, U256::from(21u64))
            .await;
        assert!(matches!(
            err,
            Err(ProtocolError::InsufficientAllowance { .. })
        ));
    }
}
