//! Authentication decision for route-level logic.

use std::sync::Arc;

use taskboard_domain::token::{self, TokenStatus};
use taskboard_domain::{SessionKey, SessionSnapshot};

use crate::ports::{Clock, TokenStore};

/// Decides whether the stored session may see protected content.
///
/// A session counts as authenticated when both tokens are stored, or when
/// either stored token is independently valid. A stored but expired pair is
/// therefore still authenticated here; the mount-time refresh settles it.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl SessionGuard {
    /// Creates a guard over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reads both tokens and evaluates them. No side effects.
    pub async fn evaluate(&self) -> SessionSnapshot {
        let access_token = self.store.get(SessionKey::AccessToken).await;
        let refresh_token = self.store.get(SessionKey::RefreshToken).await;
        let now = self.clock.validity_instant();

        let both_present = access_token.is_some() && refresh_token.is_some();
        let either_valid = [&access_token, &refresh_token]
            .into_iter()
            .flatten()
            .any(|t| token::is_valid(t, now));

        SessionSnapshot {
            is_authenticated: both_present || either_valid,
            access_token,
            refresh_token,
        }
    }

    /// Subject encoded in the stored access token.
    pub async fn subject(&self) -> Option<String> {
        let access_token = self.store.get(SessionKey::AccessToken).await?;
        token::subject_of(&access_token)
    }

    /// Display status of the stored access token.
    pub async fn status(&self) -> TokenStatus {
        let access_token = self.store.get(SessionKey::AccessToken).await;
        let has_refresh = self.store.get(SessionKey::RefreshToken).await.is_some();
        token::token_status(
            access_token.as_deref(),
            has_refresh,
            self.clock.validity_instant(),
        )
    }
}
