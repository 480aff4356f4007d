//! Authenticated request gateway.
//!
//! Every backend call goes through [`ApiGateway::request`]. It attaches the
//! bearer credential, and when the backend rejects the call as
//! unauthenticated it performs at most one refresh followed by at most one
//! retry. The two steps are separate methods so a retried attempt can never
//! start another refresh.

mod reply;

pub use reply::{ApiError, Reply};

use std::sync::Arc;

use taskboard_domain::http::{AUTHORIZATION, CONTENT_TYPE, JSON_MEDIA_TYPE};
use taskboard_domain::{ApiRequest, ApiResponse, Headers, SessionKey};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::ports::{HttpClient, Navigator, TokenStore};
use crate::session::{RefreshCoordinator, RefreshTrigger, evict};

/// Statuses treated as an authentication failure by default.
pub const DEFAULT_REFRESH_STATUSES: [u16; 3] = [401, 403, 404];

/// Whether an authentication failure may be recovered by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// Refresh once and retry once.
    #[default]
    RefreshOnce,
    /// Surface the failure as is.
    Never,
}

/// Fetch wrapper shared by all API calls.
pub struct ApiGateway {
    store: Arc<dyn TokenStore>,
    http: Arc<dyn HttpClient>,
    coordinator: Arc<RefreshCoordinator>,
    navigator: Arc<dyn Navigator>,
    refresh_statuses: Vec<u16>,
    /// Refresh generation whose failure already signed the user out.
    evicted_at: Mutex<Option<u64>>,
}

impl ApiGateway {
    /// Creates a gateway using [`DEFAULT_REFRESH_STATUSES`].
    #[must_use]
    pub fn new(
        store: Arc<dyn TokenStore>,
        http: Arc<dyn HttpClient>,
        coordinator: Arc<RefreshCoordinator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            http,
            coordinator,
            navigator,
            refresh_statuses: DEFAULT_REFRESH_STATUSES.to_vec(),
            evicted_at: Mutex::new(None),
        }
    }

    /// Overrides the statuses that count as an authentication failure.
    #[must_use]
    pub fn with_refresh_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.refresh_statuses = statuses.into();
        self
    }

    /// Issues `request`, recovering once from an authentication failure when
    /// `policy` allows it.
    ///
    /// When the refresh fails the session is evicted, sign-in is requested and
    /// [`Reply::SignedOut`] is returned.
    ///
    /// # Errors
    ///
    /// [`ApiError::Request`] for an unsuccessful status that was not
    /// recovered, [`ApiError::Network`] when no response arrived, and
    /// [`ApiError::Body`] when a JSON body does not parse.
    pub async fn request(
        &self,
        request: &ApiRequest,
        policy: RetryPolicy,
    ) -> Result<Reply, ApiError> {
        let response = self.attempt(request).await?;
        if policy == RetryPolicy::RefreshOnce && self.is_auth_failure(response.status) {
            debug!(
                request_id = %request.id,
                status = response.status,
                "authentication failure, refreshing"
            );
            return self.retry_once(request).await;
        }
        Reply::from_response(response)
    }

    /// Refreshes the access token, then re-issues `request` exactly once.
    async fn retry_once(&self, request: &ApiRequest) -> Result<Reply, ApiError> {
        if self
            .coordinator
            .refresh(RefreshTrigger::AuthFailure)
            .await
            .is_none()
        {
            self.sign_out().await;
            return Ok(Reply::SignedOut);
        }

        info!(request_id = %request.id, url = %request.url, "retrying after refresh");
        let response = self.attempt(request).await?;
        Reply::from_response(response)
    }

    /// Evicts the session once per failed refresh. Callers that shared the
    /// same failed exchange return without redirecting again.
    async fn sign_out(&self) {
        let generation = self.coordinator.generation();
        let mut evicted_at = self.evicted_at.lock().await;
        if *evicted_at == Some(generation) {
            debug!(generation, "session already evicted for this refresh");
            return;
        }
        *evicted_at = Some(generation);
        evict(self.store.as_ref(), self.navigator.as_ref()).await;
    }

    /// Issues `request` without a credential and without any refresh, for
    /// the endpoints that create a session.
    ///
    /// # Errors
    ///
    /// Same as [`ApiGateway::request`].
    pub async fn request_public(&self, request: &ApiRequest) -> Result<Reply, ApiError> {
        let response = self.send(request, None).await?;
        Reply::from_response(response)
    }

    /// One network call with the current credential.
    async fn attempt(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let access_token = self.store.get(SessionKey::AccessToken).await;
        self.send(request, access_token.as_deref()).await
    }

    async fn send(
        &self,
        request: &ApiRequest,
        access_token: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let outgoing = ApiRequest {
            headers: Self::headers_for(access_token, &request.headers),
            ..request.clone()
        };

        debug!(
            request_id = %request.id,
            method = %request.method,
            url = %request.url,
            "sending request"
        );
        let response = self.http.execute(&outgoing).await?;
        debug!(request_id = %request.id, status = response.status, "response received");
        Ok(response)
    }

    fn headers_for(access_token: Option<&str>, caller: &Headers) -> Headers {
        let mut headers = Headers::new();
        if let Some(token) = access_token {
            headers.set(AUTHORIZATION, format!("Bearer {token}"));
        }
        headers.set(CONTENT_TYPE, JSON_MEDIA_TYPE);
        headers.merge(caller);
        headers
    }

    fn is_auth_failure(&self, status: u16) -> bool {
        self.refresh_statuses.contains(&status)
    }
}
