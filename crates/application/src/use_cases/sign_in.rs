//! Sign-in use case.

use std::sync::Arc;

use taskboard_domain::{ApiRequest, Endpoints, SignInRequest, TokenPair};

use super::open_session;
use crate::error::ApplicationResult;
use crate::gateway::ApiGateway;
use crate::ports::{Navigator, TokenStore};

/// Exchanges credentials for a token pair and opens the session.
pub struct SignIn {
    gateway: Arc<ApiGateway>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    endpoints: Endpoints,
}

impl SignIn {
    /// Creates a new `SignIn` use case.
    #[must_use]
    pub fn new(
        gateway: Arc<ApiGateway>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            gateway,
            store,
            navigator,
            endpoints,
        }
    }

    /// Authenticates and replaces any stored session with the issued pair.
    ///
    /// Rejected credentials are reported as is; they never trigger a refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials or answers
    /// without a token pair. Nothing is stored in that case.
    pub async fn execute(&self, credentials: &SignInRequest) -> ApplicationResult<TokenPair> {
        let request = ApiRequest::post(self.endpoints.authenticate()).with_json(credentials)?;
        let reply = self.gateway.request_public(&request).await?;
        open_session(reply, self.store.as_ref(), self.navigator.as_ref()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::gateway::ApiError;
    use crate::session::InMemoryTokenStore;
    use crate::testing::{Harness, endpoints, json_response, text_response};
    use pretty_assertions::assert_eq;
    use taskboard_domain::{Route, SessionKey};

    fn sign_in(harness: &Harness) -> SignIn {
        SignIn::new(
            harness.gateway.clone(),
            Arc::new(harness.store.clone()),
            harness.navigator.clone(),
            endpoints(),
        )
    }

    #[tokio::test]
    async fn test_sign_in_replaces_stale_session() {
        let h = Harness::new(InMemoryTokenStore::with_session(&TokenPair::new("OLD", "OLDR")));
        h.http.respond(
            &endpoints().authenticate(),
            json_response(200, r#"{"accessToken":"T1","refreshToken":"R1"}"#),
        );

        let pair = sign_in(&h)
            .execute(&SignInRequest::new("a@b.com", "pw"))
            .await
            .unwrap();

        assert_eq!(pair, TokenPair::new("T1", "R1"));
        assert_eq!(
            h.store.get(SessionKey::AccessToken).await.as_deref(),
            Some("T1")
        );
        assert_eq!(
            h.store.get(SessionKey::RefreshToken).await.as_deref(),
            Some("R1")
        );
        assert_eq!(h.store.count().await, 2);
        assert_eq!(h.navigator.routes(), vec![Route::Home]);

        let sent = &h.http.calls()[0];
        assert_eq!(
            sent.body.as_deref(),
            Some(r#"{"username":"a@b.com","password":"pw"}"#)
        );
        assert!(!sent.headers.contains("Authorization"));
    }

    #[tokio::test]
    async fn test_rejected_credentials_do_not_refresh() {
        let h = Harness::new(InMemoryTokenStore::new());
        h.http.respond(
            &endpoints().authenticate(),
            text_response(403, "Bad credentials"),
        );

        let error = sign_in(&h)
            .execute(&SignInRequest::new("a@b.com", "wrong"))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            ApplicationError::Api(ApiError::Request { status: 403, .. })
        ));
        assert_eq!(h.http.calls_to(&endpoints().refresh()), 0);
        assert_eq!(h.store.count().await, 0);
        assert!(h.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tokens_store_nothing() {
        let h = Harness::new(InMemoryTokenStore::new());
        h.http
            .respond(&endpoints().authenticate(), json_response(200, "{}"));

        let result = sign_in(&h)
            .execute(&SignInRequest::new("a@b.com", "pw"))
            .await;

        assert!(result.is_err());
        assert_eq!(h.store.count().await, 0);
    }
}
