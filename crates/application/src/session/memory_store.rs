//! In-memory token store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use taskboard_domain::{SessionKey, TokenPair};
use tokio::sync::RwLock;

use crate::ports::TokenStore;

/// Thread-safe in-memory token store.
///
/// Clones share the same storage. Nothing survives the process; use the
/// file-backed store from the infrastructure crate for durable sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<SessionKey, String>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `pair`.
    #[must_use]
    pub fn with_session(pair: &TokenPair) -> Self {
        let tokens = SessionKey::ALL
            .into_iter()
            .map(|key| (key, pair.get(key).to_string()))
            .collect();
        Self {
            tokens: Arc::new(RwLock::new(tokens)),
        }
    }

    /// Number of stored keys.
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, key: SessionKey) -> Option<String> {
        self.tokens.read().await.get(&key).cloned()
    }

    async fn set(&self, key: SessionKey, value: &str) {
        self.tokens.write().await.insert(key, value.to_string());
    }

    async fn clear(&self, key: SessionKey) {
        self.tokens.write().await.remove(&key);
    }

    async fn clear_all(&self) {
        self.tokens.write().await.clear();
    }

    async fn replace_session(&self, pair: &TokenPair) {
        let mut tokens = self.tokens.write().await;
        tokens.clear();
        for key in SessionKey::ALL {
            tokens.insert(key, pair.get(key).to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_set_is_immediately_visible() {
        let store = InMemoryTokenStore::new();
        store.set(SessionKey::AccessToken, "T1").await;

        assert_eq!(
            store.get(SessionKey::AccessToken).await.as_deref(),
            Some("T1")
        );
        assert_eq!(store.get(SessionKey::RefreshToken).await, None);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = InMemoryTokenStore::new();
        let other = store.clone();
        other.set(SessionKey::RefreshToken, "R1").await;

        assert_eq!(
            store.get(SessionKey::RefreshToken).await.as_deref(),
            Some("R1")
        );
    }

    #[tokio::test]
    async fn test_clear_all_removes_both_keys() {
        let store = InMemoryTokenStore::with_session(&TokenPair::new("T1", "R1"));
        assert_eq!(store.count().await, 2);

        store.clear_all().await;
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_replace_session_drops_stale_values() {
        let store = InMemoryTokenStore::with_session(&TokenPair::new("old-T", "old-R"));
        store.replace_session(&TokenPair::new("T1", "R1")).await;

        assert_eq!(
            store.get(SessionKey::AccessToken).await.as_deref(),
            Some("T1")
        );
        assert_eq!(
            store.get(SessionKey::RefreshToken).await.as_deref(),
            Some("R1")
        );
        assert_eq!(store.count().await, 2);
    }
}
