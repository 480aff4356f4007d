//! User endpoints.

use std::sync::Arc;

use taskboard_domain::{ApiRequest, Endpoints, ProfileUpdate, UserProfile};

use crate::error::{ApplicationError, ApplicationResult};
use crate::gateway::{ApiGateway, Reply, RetryPolicy};

/// User profile calls.
#[derive(Clone)]
pub struct UserApi {
    gateway: Arc<ApiGateway>,
    endpoints: Endpoints,
}

impl UserApi {
    /// Creates the wrapper.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>, endpoints: Endpoints) -> Self {
        Self { gateway, endpoints }
    }

    /// Profile keyed by email (the token subject).
    ///
    /// # Errors
    ///
    /// [`ApplicationError::SignedOut`] when the session ended during the
    /// call, otherwise gateway failures.
    pub async fn by_email(&self, email: &str) -> ApplicationResult<UserProfile> {
        self.fetch(ApiRequest::get(self.endpoints.user_by_email(email)))
            .await
    }

    /// Profile keyed by numeric id.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn by_id(&self, id: i64) -> ApplicationResult<UserProfile> {
        self.fetch(ApiRequest::get(self.endpoints.user_by_id(id)))
            .await
    }

    /// Users whose name matches `content`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn search_by_name(&self, content: &str) -> ApplicationResult<Vec<UserProfile>> {
        self.fetch(ApiRequest::get(self.endpoints.users_by_name(content)))
            .await
    }

    /// Updates name and email of user `id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn update(&self, id: i64, update: &ProfileUpdate) -> ApplicationResult<Reply> {
        let request = ApiRequest::put(self.endpoints.update_user(id)).with_json(update)?;
        Ok(self
            .gateway
            .request(&request, RetryPolicy::RefreshOnce)
            .await?)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ApplicationResult<T> {
        let reply = self
            .gateway
            .request(&request, RetryPolicy::RefreshOnce)
            .await?;
        if reply.is_signed_out() {
            return Err(ApplicationError::SignedOut);
        }
        reply.json()?.ok_or_else(|| empty_body(&request))
    }
}

fn empty_body(request: &ApiRequest) -> ApplicationError {
    ApplicationError::UnexpectedResponse(format!("empty body from {}", request.url))
}
