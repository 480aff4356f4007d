//! Sign-up use case.

use std::sync::Arc;

use taskboard_domain::{ApiRequest, Endpoints, SignUpRequest, TokenPair};

use super::open_session;
use crate::error::ApplicationResult;
use crate::gateway::ApiGateway;
use crate::ports::{Navigator, TokenStore};

/// Registers an account and opens a session with the issued pair.
pub struct SignUp {
    gateway: Arc<ApiGateway>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    endpoints: Endpoints,
}

impl SignUp {
    /// Creates a new `SignUp` use case.
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

    /// Registers `account` and stores the returned pair.
    ///
    /// # Errors
    ///
    /// Returns an error if registration is refused or the response carries
    /// no token pair.
    pub async fn execute(&self, account: &SignUpRequest) -> ApplicationResult<TokenPair> {
        let request = ApiRequest::post(self.endpoints.register()).with_json(account)?;
        let reply = self.gateway.request_public(&request).await?;
        open_session(reply, self.store.as_ref(), self.navigator.as_ref()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::InMemoryTokenStore;
    use crate::testing::{Harness, endpoints, json_response, text_response};
    use pretty_assertions::assert_eq;
    use taskboard_domain::{Route, SessionKey};

    fn sign_up(harness: &Harness) -> SignUp {
        SignUp::new(
            harness.gateway.clone(),
            Arc::new(harness.store.clone()),
            harness.navigator.clone(),
            endpoints(),
        )
    }

    #[tokio::test]
    async fn test_sign_up_opens_session() {
        let h = Harness::new(InMemoryTokenStore::new());
        h.http.respond(
            &endpoints().register(),
            json_response(200, r#"{"accessToken":"T1","refreshToken":"R1"}"#),
        );

        sign_up(&h)
            .execute(&SignUpRequest::new("Ann", "a@b.com", "pw"))
            .await
            .unwrap();

        assert_eq!(
            h.store.get(SessionKey::RefreshToken).await.as_deref(),
            Some("R1")
        );
        assert_eq!(h.navigator.routes(), vec![Route::Home]);
        assert_eq!(
            h.http.calls()[0].body.as_deref(),
            Some(r#"{"name":"Ann","email":"a@b.com","password":"pw"}"#)
        );
    }

    #[tokio::test]
    async fn test_taken_email_is_reported() {
        let h = Harness::new(InMemoryTokenStore::new());
        h.http.respond(
            &endpoints().register(),
            text_response(409, "Email already in use"),
        );

        let error = sign_up(&h)
            .execute(&SignUpRequest::new("Ann", "a@b.com", "pw"))
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Email already in use");
        assert_eq!(h.store.count().await, 0);
    }
}
