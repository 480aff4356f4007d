//! Logout use case.

use std::sync::Arc;

use crate::ports::{Navigator, TokenStore};
use crate::session::evict;

/// Ends the session locally. The backend keeps no session state to revoke.
pub struct Logout {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Clears both tokens and navigates to sign-in, whatever is stored.
    pub async fn execute(&self) {
        evict(self.store.as_ref(), self.navigator.as_ref()).await;
    }
}
