//! Session lifecycle: storage, evaluation, refresh and eviction.

mod guard;
mod keeper;
mod memory_store;
mod refresh;

pub use guard::SessionGuard;
pub use keeper::{ActiveSession, LifecycleEvent, SessionKeeper, Visibility};
pub use memory_store::InMemoryTokenStore;
pub use refresh::{RefreshCoordinator, RefreshError, RefreshState, RefreshTrigger};

use taskboard_domain::Route;
use tracing::info;

use crate::ports::{Navigator, TokenStore};

/// Clears both tokens and sends the user to sign-in.
pub async fn evict(store: &dyn TokenStore, navigator: &dyn Navigator) {
    store.clear_all().await;
    info!("session evicted");
    navigator.navigate(Route::SignIn);
}
