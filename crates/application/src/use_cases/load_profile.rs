//! Load profile use case.

use std::sync::Arc;

use taskboard_domain::{SessionKey, UserProfile, token};

use crate::api::UserApi;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::TokenStore;

/// Fetches the profile of the user identified by the stored access token.
pub struct LoadProfile {
    store: Arc<dyn TokenStore>,
    users: UserApi,
}

impl LoadProfile {
    /// Creates a new `LoadProfile` use case.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, users: UserApi) -> Self {
        Self { store, users }
    }

    /// Decodes the token subject and looks the user up by email.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::NotAuthenticated`] when no access token is stored
    /// - [`ApplicationError::InvalidToken`] when the token has no readable subject
    /// - gateway failures from the lookup
    pub async fn execute(&self) -> ApplicationResult<UserProfile> {
        let access_token = self
            .store
            .get(SessionKey::AccessToken)
            .await
            .ok_or(ApplicationError::NotAuthenticated)?;
        let subject = token::decode(&access_token)?.subject;
        self.users.by_email(&subject).await
    }
}
