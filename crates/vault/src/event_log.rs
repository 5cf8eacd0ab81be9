//! Event log for vault state transitions.

use range_vault_domain::events::{VaultEvent, VaultEventKind};
use tokio::sync::RwLock;
use tracing::info;

/// Append-only in-memory record of a vault's lifecycle.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: RwLock<Vec<VaultEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event and mirrors it to the tracing subscriber.
    pub async fn record(&self, event: VaultEvent) {
        info!(
            vault = %event.vault,
            kind = ?event.kind,
            at = event.at,
            "vault event"
        );
        self.entries.write().await.push(event);
    }

    /// Snapshot of all recorded events, in order.
    pub async fn snapshot(&self) -> Vec<VaultEvent> {
        self.entries.read().await.clone()
    }

    /// Number of recorded events of `kind`.
    pub async fn count_of(&self, kind: VaultEventKind) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|event| event.kind == kind)
            .count()
    }
}
