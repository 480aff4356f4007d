//! Access token renewal.
//!
//! Every trigger (mount, focus, visibility, a failed API call) funnels into
//! [`RefreshCoordinator::refresh`]. Concurrent callers are serialised; a caller
//! that waited behind an exchange shares its outcome instead of issuing a
//! second one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use taskboard_domain::http::{CONTENT_TYPE, JSON_MEDIA_TYPE};
use taskboard_domain::token::token_preview;
use taskboard_domain::{ApiRequest, RefreshRequest, RefreshResponse, SessionKey, TokenPair};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::ports::{HttpClient, HttpClientError, TokenStore};

/// What caused a refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTrigger {
    /// The protected view was mounted.
    Mount,
    /// The window regained focus.
    FocusRegained,
    /// The document became visible.
    BecameVisible,
    /// An API call was rejected as unauthenticated.
    AuthFailure,
    /// Explicit request from the shell.
    Manual,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mount => "mount",
            Self::FocusRegained => "focus",
            Self::BecameVisible => "visibility",
            Self::AuthFailure => "auth-failure",
            Self::Manual => "manual",
        })
    }
}

/// Refresh state machine: `Idle -> Refreshing -> {Succeeded, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    /// No refresh has run yet, or the last one was cancelled.
    #[default]
    Idle,
    /// An exchange is in flight.
    Refreshing,
    /// The last exchange stored a new access token.
    Succeeded,
    /// The last exchange failed; the session must be evicted.
    Failed,
}

impl RefreshState {
    /// Check if an exchange is in flight.
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::Refreshing)
    }

    /// Check if the last exchange finished (success or failure).
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Get a user-friendly message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Idle => "Session not yet checked",
            Self::Refreshing => "Refreshing token...",
            Self::Succeeded => "Session refreshed",
            Self::Failed => "Session expired",
        }
    }
}

/// Why an exchange failed. Logged, never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// No refresh token is stored.
    #[error("no refresh token stored")]
    NoRefreshToken,

    /// The endpoint answered with a non-success status.
    #[error("refresh rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Response body.
        message: String,
    },

    /// No response was received.
    #[error(transparent)]
    Network(#[from] HttpClientError),

    /// The response body was not a refresh response.
    #[error("malformed refresh response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Holds the state at `Refreshing`; back to `Idle` if dropped unfinished.
struct PendingExchange<'a> {
    state: &'a watch::Sender<RefreshState>,
    finished: bool,
}

impl<'a> PendingExchange<'a> {
    fn start(state: &'a watch::Sender<RefreshState>) -> Self {
        state.send_replace(RefreshState::Refreshing);
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, outcome: RefreshState) {
        self.finished = true;
        self.state.send_replace(outcome);
    }
}

impl Drop for PendingExchange<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("refresh cancelled");
            self.state.send_replace(RefreshState::Idle);
        }
    }
}

/// Mints new access tokens from the stored refresh token.
pub struct RefreshCoordinator {
    store: Arc<dyn TokenStore>,
    http: Arc<dyn HttpClient>,
    refresh_url: String,
    state: watch::Sender<RefreshState>,
    in_flight: Mutex<()>,
    completed: AtomicU64,
}

impl RefreshCoordinator {
    /// Creates a coordinator posting to `refresh_url`.
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        http: Arc<dyn HttpClient>,
        refresh_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            http,
            refresh_url: refresh_url.into(),
            state: watch::Sender::new(RefreshState::Idle),
            in_flight: Mutex::new(()),
            completed: AtomicU64::new(0),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        *self.state.borrow()
    }

    /// Receiver that observes every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.state.subscribe()
    }

    /// Number of exchanges that ran to completion, successful or not.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Returns the new access token, or `None` when the refresh failed. The
    /// caller decides what a failure means; this method never evicts. A
    /// caller that waited behind another exchange shares its outcome.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> Option<String> {
        let seen = self.generation();
        let _in_flight = self.in_flight.lock().await;

        if self.generation() != seen {
            return self.shared_outcome(trigger).await;
        }

        let pending = PendingExchange::start(&self.state);
        let outcome = self.exchange().await;
        let token = match outcome {
            Ok(access_token) => {
                info!(%trigger, token = %token_preview(&access_token), "access token refreshed");
                pending.finish(RefreshState::Succeeded);
                Some(access_token)
            }
            Err(error) => {
                warn!(%trigger, %error, "access token refresh failed");
                pending.finish(RefreshState::Failed);
                None
            }
        };
        self.completed.fetch_add(1, Ordering::AcqRel);
        token
    }

    /// Outcome of the exchange that completed while the caller waited.
    async fn shared_outcome(&self, trigger: RefreshTrigger) -> Option<String> {
        if self.state() == RefreshState::Succeeded {
            debug!(%trigger, "reusing token from a concurrent refresh");
            self.store.get(SessionKey::AccessToken).await
        } else {
            debug!(%trigger, "concurrent refresh failed");
            None
        }
    }

    async fn exchange(&self) -> Result<String, RefreshError> {
        let refresh_token = self
            .store
            .get(SessionKey::RefreshToken)
            .await
            .ok_or(RefreshError::NoRefreshToken)?;

        let request = ApiRequest::post(&self.refresh_url)
            .with_header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .with_json(&RefreshRequest {
                refresh_token: refresh_token.clone(),
            })?;

        let response = self.http.execute(&request).await?;
        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: response.body,
            });
        }

        let RefreshResponse {
            access_token,
            refresh_token: rotated,
        } = serde_json::from_str(&response.body)?;

        match rotated {
            Some(rotated) if rotated != refresh_token => {
                debug!("server rotated the refresh token");
                self.store
                    .replace_session(&TokenPair::new(access_token.clone(), rotated))
                    .await;
            }
            _ => self.store.set(SessionKey::AccessToken, &access_token).await,
        }
        Ok(access_token)
    }
}
