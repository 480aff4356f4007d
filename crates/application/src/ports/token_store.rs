//! Token storage port

use async_trait::async_trait;
use taskboard_domain::{SessionKey, TokenPair};

/// Persisted holder of the access and refresh tokens.
///
/// Writes must be visible to the next read in the same process. Storage
/// failures are absorbed by the implementation: an unavailable store behaves
/// like an empty one and never returns an error to the session core.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the value stored under `key`.
    async fn get(&self, key: SessionKey) -> Option<String>;

    /// Stores `value` under `key`.
    async fn set(&self, key: SessionKey, value: &str);

    /// Removes `key`.
    async fn clear(&self, key: SessionKey);

    /// Removes both keys.
    async fn clear_all(&self) {
        for key in SessionKey::ALL {
            self.clear(key).await;
        }
    }

    /// Replaces the whole session with `pair`, leaving no stale values.
    async fn replace_session(&self, pair: &TokenPair) {
        self.clear_all().await;
        for key in SessionKey::ALL {
            self.set(key, pair.get(key)).await;
        }
    }
}
