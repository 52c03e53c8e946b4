//! Seen-set persistence
//!
//! Abstract interface for the list of terms already dispensed in the current
//! cycle. Implementations: [`GistSeenStore`](crate::gist::GistSeenStore) for
//! durable storage, [`InMemorySeenStore`] for tests and local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CycleError;

#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Terms dispensed so far in this cycle, in dispense order.
    async fn read_seen(&self) -> Result<Vec<String>, CycleError>;

    /// Replace the stored list wholesale.
    async fn write_seen(&self, seen: &[String]) -> Result<(), CycleError>;
}

/// Process-local seen-set. Same contract as the remote store, no durability.
#[derive(Debug, Default)]
pub struct InMemorySeenStore {
    seen: RwLock<Vec<String>>,
}

impl InMemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seen<I, T>(seen: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            seen: RwLock::new(seen.into_iter().map(Into::into).collect()),
        }
    }

    pub async fn snapshot(&self) -> Vec<String> {
        self.seen.read().await.clone()
    }
}

#[async_trait]
impl SeenStore for InMemorySeenStore {
    async fn read_seen(&self) -> Result<Vec<String>, CycleError> {
        Ok(self.seen.read().await.clone())
    }

    async fn write_seen(&self, seen: &[String]) -> Result<(), CycleError> {
        let mut guard = self.seen.write().await;
        guard.clear();
        guard.extend_from_slice(seen);
        Ok(())
    }
}
