//! Per-vault operation lock.
//!
//! Asset-transfer calls can re-enter the vault through arbitrary external
//! code, so every state-mutating entry point holds this lock for its whole
//! duration. A nested entry fails immediately instead of observing a
//! position that has been destroyed but not yet recreated.

use range_vault_domain::StateError;
use tokio::sync::{Mutex, MutexGuard};

/// Scoped mutual exclusion over a vault's mutating operations.
#[derive(Debug, Default)]
pub struct OperationLock {
    inner: Mutex<()>,
}

/// RAII permit; the lock releases on every exit path when this drops.
pub struct OperationPermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl OperationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock, failing immediately if an operation is already
    /// in progress.
    pub fn enter(&self) -> Result<OperationPermit<'_>, StateError> {
        self.inner
            .try_lock()
            .map(|guard| OperationPermit { _guard: guard })
            .map_err(|_| StateError::OperationInProgress)
    }
}
